//! Shared runtime state

use comanda_client::BackendClient;
use comanda_printer::GhostscriptPipeline;
use shared::feed::FeedSender;
use shared::settings::{Settings, SettingsHandle};
use std::sync::Arc;

use crate::dispatcher::PrintDispatcher;
use crate::renderer::{CurlFetcher, OrderRenderer};

/// Everything the workers share
///
/// Built once at startup; components receive their dependencies here
/// instead of reaching for ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub settings: SettingsHandle,
    pub feed: FeedSender,
    pub client: Arc<BackendClient>,
    pub renderer: Arc<OrderRenderer>,
    pub dispatcher: Arc<PrintDispatcher>,
}

impl AppState {
    /// Production wiring: curl fetcher and Ghostscript pipeline
    pub fn initialize(settings: Settings, feed: FeedSender) -> Self {
        let fetcher = Arc::new(CurlFetcher::new(settings.fetch_command.as_str()));
        let pipeline = Arc::new(GhostscriptPipeline::new(settings.gs_command.as_str()));

        let settings = SettingsHandle::new(settings);
        let client = Arc::new(BackendClient::new(settings.clone(), feed.clone()));
        let renderer = Arc::new(OrderRenderer::new(
            settings.clone(),
            feed.clone(),
            fetcher,
        ));
        let dispatcher = Arc::new(PrintDispatcher::new(
            settings.clone(),
            feed.clone(),
            renderer.clone(),
            pipeline,
        ));

        Self {
            settings,
            feed,
            client,
            renderer,
            dispatcher,
        }
    }
}
