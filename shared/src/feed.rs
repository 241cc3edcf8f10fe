//! Status feed
//!
//! Workers never touch the presentation layer directly; they push
//! [`FeedEvent`]s through an unbounded channel and the shell (or the
//! headless log consumer) drains them. Status lines carry light HTML for
//! the live log widget; [`strip_markup`] yields the plain-text form.

use chrono::{DateTime, Local};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// What the preview pane should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewTarget {
    /// Local rendered artifact
    File(PathBuf),
    /// Remote page (profile, print view)
    Url(String),
}

/// One event on the operator status feed
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// HTML-flavored status line, appended to the live log
    Status(String),
    /// Blocking alert shown to the operator
    Alert { title: String, message: String },
    /// A backend request started (`true`) or finished (`false`)
    Progress(bool),
    /// Cosmetic progress animation tick
    ProgressTick,
    /// Show a document or page in the preview pane
    Preview(PreviewTarget),
    /// Result of a queue check
    LastChecked { waiting: u64, at: DateTime<Local> },
}

/// Sending half of the status feed
///
/// Sends never fail: if the consumer is gone (shutdown), events are
/// silently dropped.
#[derive(Debug, Clone)]
pub struct FeedSender(mpsc::UnboundedSender<FeedEvent>);

impl FeedSender {
    /// Create a feed channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<FeedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }

    pub fn send(&self, event: FeedEvent) {
        let _ = self.0.send(event);
    }

    pub fn status(&self, line: impl Into<String>) {
        self.send(FeedEvent::Status(line.into()));
    }

    pub fn alert(&self, title: impl Into<String>, message: impl Into<String>) {
        self.send(FeedEvent::Alert {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn progress(&self, busy: bool) {
        self.send(FeedEvent::Progress(busy));
    }

    pub fn preview(&self, target: PreviewTarget) {
        self.send(FeedEvent::Preview(target));
    }
}

/// Strip HTML markup from a status line for plain-text logging
pub fn strip_markup(line: &str) -> String {
    let mut plain = String::with_capacity(line.len());
    let mut in_tag = false;
    for ch in line.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => plain.push(ch),
            _ => {}
        }
    }
    plain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_spans_and_anchors() {
        let line = r#"pedido Nº <span style="color: #0000FF;">42</span> <a href="x">Visualizar</a>"#;
        assert_eq!(strip_markup(line), "pedido Nº 42 Visualizar");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(strip_markup("sem marcação"), "sem marcação");
    }

    #[test]
    fn channel_delivers_events() {
        let (feed, mut rx) = FeedSender::channel();
        feed.status("olá");
        match rx.try_recv() {
            Ok(FeedEvent::Status(line)) => assert_eq!(line, "olá"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn send_after_receiver_drop_is_ignored() {
        let (feed, rx) = FeedSender::channel();
        drop(rx);
        feed.progress(true);
    }
}
