//! Artifact janitor
//!
//! Sweeps the flat artifact directory, deleting every rendered order
//! document. Per-file failures land on the feed and the sweep keeps
//! going; completion is always reported, even when nothing matched.

use shared::feed::FeedSender;
use std::path::Path;
use tokio::fs;

/// Outcome of one cleanup pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: usize,
    pub failed: usize,
}

/// True for names the renderer produces: `Order#<digits>.pdf`
pub fn is_artifact_name(name: &str) -> bool {
    name.strip_prefix("Order#")
        .and_then(|rest| rest.strip_suffix(".pdf"))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Delete every rendered artifact under `dir`
pub async fn cleanup(dir: &Path, feed: &FeedSender) -> CleanupReport {
    let mut report = CleanupReport::default();

    match fs::read_dir(dir).await {
        Ok(mut entries) => {
            while let Ok(Some(entry)) = entries.next_entry().await {
                let name = entry.file_name();
                let Some(name) = name.to_str() else { continue };
                if !is_artifact_name(name) {
                    continue;
                }

                match fs::remove_file(entry.path()).await {
                    Ok(()) => report.deleted += 1,
                    Err(err) => {
                        report.failed += 1;
                        feed.status(format!(
                            r#"<span style="color: #f77b36;">Erro ao apagar comanda/recibo: {err}</span>"#
                        ));
                    }
                }
            }
        }
        Err(err) => {
            report.failed += 1;
            feed.status(format!(
                r#"<span style="color: #f77b36;">Erro ao apagar comanda/recibo: {err}</span>"#
            ));
        }
    }

    feed.alert(
        "Pronto!",
        "Processo de limpeza de arquivos temporários realizado.",
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::FeedEvent;

    #[test]
    fn matches_only_renderer_names() {
        assert!(is_artifact_name("Order#1.pdf"));
        assert!(is_artifact_name("Order#123456.pdf"));
        assert!(!is_artifact_name("Order#.pdf"));
        assert!(!is_artifact_name("Order#12a.pdf"));
        assert!(!is_artifact_name("Order#12.txt"));
        assert!(!is_artifact_name("notes.txt"));
        assert!(!is_artifact_name("order#12.pdf"));
    }

    #[tokio::test]
    async fn deletes_artifacts_and_leaves_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Order#1.pdf", "Order#2.pdf", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let (feed, mut rx) = FeedSender::channel();
        let report = cleanup(dir.path(), &feed).await;

        assert_eq!(report, CleanupReport { deleted: 2, failed: 0 });
        assert!(dir.path().join("notes.txt").exists());
        assert!(!dir.path().join("Order#1.pdf").exists());
        assert!(!dir.path().join("Order#2.pdf").exists());

        // completion is always announced
        match rx.try_recv() {
            Ok(FeedEvent::Alert { title, .. }) => assert_eq!(title, "Pronto!"),
            other => panic!("expected alert, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_directory_still_reports_completion() {
        let dir = tempfile::tempdir().unwrap();
        let (feed, mut rx) = FeedSender::channel();

        let report = cleanup(dir.path(), &feed).await;

        assert_eq!(report, CleanupReport::default());
        assert!(matches!(rx.try_recv(), Ok(FeedEvent::Alert { .. })));
    }

    #[tokio::test]
    async fn missing_directory_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("nope");
        let (feed, mut rx) = FeedSender::channel();

        let report = cleanup(&gone, &feed).await;

        assert_eq!(report.failed, 1);
        assert!(matches!(rx.try_recv(), Ok(FeedEvent::Status(_))));
        assert!(matches!(rx.try_recv(), Ok(FeedEvent::Alert { .. })));
    }
}
