use anyhow::Context;
use relay_server::{AppState, BackgroundTasks, PollCommand, PollWorker, TaskKind, progress};
use shared::feed::{FeedEvent, FeedSender, strip_markup};
use shared::settings::Settings;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger();

    tracing::info!("comanda relay starting");

    let settings = Settings::from_env();
    std::fs::create_dir_all(&settings.artifact_dir).with_context(|| {
        format!(
            "creating artifact directory {}",
            settings.artifact_dir.display()
        )
    })?;

    let (feed, feed_rx) = FeedSender::channel();
    let state = AppState::initialize(settings, feed.clone());

    let (worker, handle) = PollWorker::new(
        state.settings.clone(),
        state.feed.clone(),
        state.client.clone(),
        state.dispatcher.clone(),
    );

    let mut tasks = BackgroundTasks::new();
    let shutdown = tasks.shutdown_token();

    tasks.spawn("poll_worker", TaskKind::Worker, worker.run(shutdown.clone()));
    tasks.spawn(
        "progress_ticker",
        TaskKind::Periodic,
        progress::run(state.client.busy_signal(), feed.clone(), shutdown.clone()),
    );
    tasks.spawn(
        "feed_logger",
        TaskKind::Listener,
        feed_logger(feed_rx, shutdown.clone()),
    );

    // load the store list up front, then kick an immediate check so the
    // operator sees activity right away
    handle.send(PollCommand::Reload);
    handle.send(PollCommand::CheckNow);

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    tracing::info!("shutdown requested");

    tasks.shutdown().await;
    Ok(())
}

fn init_logger() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Headless feed consumer: the stand-in for the graphical shell. Strips
/// markup from status lines and logs every event.
async fn feed_logger(mut rx: mpsc::UnboundedReceiver<FeedEvent>, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,

            event = rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    FeedEvent::Status(line) => {
                        tracing::info!(target: "feed", "{}", strip_markup(&line));
                    }
                    FeedEvent::Alert { title, message } => {
                        tracing::warn!(target: "feed", "[{title}] {message}");
                    }
                    FeedEvent::LastChecked { waiting, at } => {
                        tracing::info!(
                            target: "feed",
                            "Última checagem às {} [{waiting} na fila]",
                            at.format("%H:%M:%S")
                        );
                    }
                    FeedEvent::Preview(target) => {
                        tracing::debug!(target: "feed", ?target, "preview requested");
                    }
                    FeedEvent::Progress(busy) => {
                        tracing::debug!(target: "feed", busy, "request in flight");
                    }
                    // the animation tick is only meaningful to a real shell
                    FeedEvent::ProgressTick => {}
                }
            }
        }
    }
}
