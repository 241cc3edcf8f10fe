//! Order renderer
//!
//! Resolves which document template applies to an order, downloads the
//! rendered PDF through the external fetch tool and hands back the local
//! artifact path. The artifact name is a pure function of the order id,
//! so re-downloading an order overwrites its own file and nothing else.

use async_trait::async_trait;
use comanda_client::EndpointError;
use shared::feed::{FeedSender, PreviewTarget};
use shared::models::{Order, OrderId};
use shared::settings::{Settings, SettingsHandle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::process::Command;

/// Render failure - short-circuits printing, never panics the loop
#[derive(Debug, Error)]
pub enum RenderError {
    /// Backend host missing or unusable
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// Fetch tool could not be started
    #[error("failed to run {command}: {source}")]
    Fetch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Fetch tool ran but reported failure
    #[error("{command} exited with {status}")]
    FetchStatus {
        command: String,
        status: std::process::ExitStatus,
    },
}

/// Deterministic artifact file name for an order
pub fn artifact_file_name(id: OrderId) -> String {
    format!("Order#{id}.pdf")
}

/// Blocking external fetch of a URL to a local file
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), RenderError>;
}

/// `curl -o <dest> <url>`
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    command: String,
}

impl CurlFetcher {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl Fetcher for CurlFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), RenderError> {
        let status = Command::new(&self.command)
            .arg("-o")
            .arg(dest)
            .arg(url)
            .status()
            .await
            .map_err(|source| RenderError::Fetch {
                command: self.command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(RenderError::FetchStatus {
                command: self.command.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Downloads rendered order documents into the artifact directory
pub struct OrderRenderer {
    settings: SettingsHandle,
    feed: FeedSender,
    fetcher: Arc<dyn Fetcher>,
}

impl OrderRenderer {
    pub fn new(settings: SettingsHandle, feed: FeedSender, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            settings,
            feed,
            fetcher,
        }
    }

    /// Download the rendered document for `order`.
    ///
    /// The preview event fires on success and on failure alike, so the
    /// operator always sees the artifact path's last state.
    pub async fn render(&self, order: &Order) -> Result<PathBuf, RenderError> {
        let settings = self.settings.snapshot().await;
        let local_path = settings.artifact_dir.join(artifact_file_name(order.id));

        let result = self.download(&settings, order, &local_path).await;
        self.feed.preview(PreviewTarget::File(local_path.clone()));

        result.map(|()| local_path)
    }

    async fn download(
        &self,
        settings: &Settings,
        order: &Order,
        dest: &Path,
    ) -> Result<(), RenderError> {
        let base = comanda_client::normalize(&settings.host)?;
        let template = settings.template_for(order.kind);
        let url = comanda_client::download_url(&base, order.id, template);

        tracing::info!(order = %order.id, template, "downloading rendered document");
        self.fetcher.fetch(&url, dest).await
    }
}
