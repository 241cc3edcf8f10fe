//! Cosmetic progress ticker
//!
//! Animates the shell's progress indicator while a backend request is in
//! flight. Runs on its own task at a fixed short cadence, independent of
//! actual request progress - the indicator only tells the operator that
//! the relay is busy, not how far along it is.

use shared::feed::{FeedEvent, FeedSender};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Animation cadence
const TICK: Duration = Duration::from_millis(100);

pub async fn run(mut busy: watch::Receiver<bool>, feed: FeedSender, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(TICK);

    loop {
        let is_busy = *busy.borrow();
        tokio::select! {
            _ = shutdown.cancelled() => break,

            // idle: sleep until the busy flag flips
            changed = busy.changed(), if !is_busy => {
                if changed.is_err() {
                    break; // client dropped
                }
            }

            // busy: animate
            _ = ticker.tick(), if is_busy => {
                feed.send(FeedEvent::ProgressTick);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ticks_only_while_busy() {
        let (busy_tx, busy_rx) = watch::channel(false);
        let (feed, mut rx) = FeedSender::channel();
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(run(busy_rx, feed, shutdown.clone()));

        // idle: no ticks
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(rx.try_recv().is_err());

        // busy: ticks arrive
        busy_tx.send(true).unwrap();
        tokio::time::sleep(Duration::from_millis(350)).await;
        let mut ticks = 0;
        while let Ok(event) = rx.try_recv() {
            assert!(matches!(event, FeedEvent::ProgressTick));
            ticks += 1;
        }
        assert!(ticks >= 1, "expected at least one tick while busy");

        shutdown.cancel();
        task.await.unwrap();
    }
}
