//! Print dispatcher
//!
//! Renders an order and drives the print pipeline, reporting the outcome
//! on the status feed. Failures never propagate: a failed render or print
//! is a status line, not a crash, and the artifact is deliberately left on
//! disk afterwards so the operator can re-preview it until the janitor
//! sweeps.

use comanda_printer::{PrintJob, PrintPipeline};
use shared::feed::FeedSender;
use shared::models::Order;
use shared::settings::SettingsHandle;
use std::sync::Arc;

use crate::renderer::OrderRenderer;

pub struct PrintDispatcher {
    settings: SettingsHandle,
    feed: FeedSender,
    renderer: Arc<OrderRenderer>,
    pipeline: Arc<dyn PrintPipeline>,
}

impl PrintDispatcher {
    pub fn new(
        settings: SettingsHandle,
        feed: FeedSender,
        renderer: Arc<OrderRenderer>,
        pipeline: Arc<dyn PrintPipeline>,
    ) -> Self {
        Self {
            settings,
            feed,
            renderer,
            pipeline,
        }
    }

    pub fn renderer(&self) -> &Arc<OrderRenderer> {
        &self.renderer
    }

    /// Render and print one order; the outcome lands on the status feed.
    pub async fn print(&self, order: &Order) {
        let settings = self.settings.snapshot().await;
        let template = settings.template_for(order.kind).to_string();
        let label = settings.templates.label_for(&template).to_string();

        let artifact = match self.renderer.render(order).await {
            Ok(path) => path,
            Err(err) => {
                tracing::error!(order = %order.id, "render failed: {err}");
                self.feed.status(format!(
                    r#"<span style="color: #f77b36;">Erro ao baixar pedido Nº {}: {err}</span>"#,
                    order.id
                ));
                return;
            }
        };

        let job = PrintJob {
            artifact,
            printer: settings.printer.clone(),
            copies: settings.copies,
            device: settings.gs_device.clone(),
        };

        match self.pipeline.print(&job).await {
            Ok(()) => {
                let view = comanda_client::normalize(&settings.host)
                    .map(|base| comanda_client::print_view_url(&base, order.id, &template))
                    .unwrap_or_default();
                self.feed.status(format!(
                    "#=> Imprimir {}x [{}], pedido Nº <span style=\"color: #0000FF;\">{}</span> \
                     na {}. <a href=\"{}\" style=\"color: #1976d2; cursor: pointer;\">Visualizar</a>",
                    settings.copies, label, order.id, settings.printer, view
                ));
            }
            Err(err) => {
                tracing::error!(order = %order.id, "print failed: {err}");
                self.feed.status(format!(
                    r#"<span style="color: #f77b36;">Erro ao imprimir pedido Nº {}: {err}</span>"#,
                    order.id
                ));
            }
        }
    }
}
