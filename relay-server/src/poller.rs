//! Poll loop
//!
//! One worker task owns the whole fetch → render → print path. Periodic
//! queue checks, interactive one-off commands and the reload flow all run
//! on this task, so two check cycles - or a check cycle and a reload -
//! can never mutate shared state concurrently.

use chrono::Local;
use comanda_client::BackendClient;
use shared::feed::{FeedEvent, FeedSender, PreviewTarget};
use shared::models::OrderId;
use shared::settings::{Settings, SettingsHandle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::dispatcher::PrintDispatcher;
use crate::janitor;

/// Observable worker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    /// Waiting for the next tick or command
    #[default]
    Idle,
    /// Talking to the backend
    Fetching,
    /// Rendering and printing fetched orders
    Dispatching,
}

/// Interactive commands accepted by the poll worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollCommand {
    /// Run a queue check immediately
    CheckNow,
    /// Fetch one order and print it
    PrintOrder(OrderId),
    /// Fetch one order and only render it for preview
    PreviewOrder(OrderId),
    /// Reload settings and refresh the store list
    Reload,
    /// Sweep the artifact directory
    Cleanup,
}

/// Handle for pushing commands into the worker
#[derive(Debug, Clone)]
pub struct PollHandle {
    commands: mpsc::UnboundedSender<PollCommand>,
    state: watch::Receiver<PollState>,
}

impl PollHandle {
    /// Enqueue a command; dropped silently once the worker is gone
    pub fn send(&self, command: PollCommand) {
        let _ = self.commands.send(command);
    }

    /// Current worker state
    pub fn state(&self) -> PollState {
        *self.state.borrow()
    }
}

/// Background worker driving the check cycle
pub struct PollWorker {
    settings: SettingsHandle,
    feed: FeedSender,
    client: Arc<BackendClient>,
    dispatcher: Arc<PrintDispatcher>,
    commands: mpsc::UnboundedReceiver<PollCommand>,
    state: watch::Sender<PollState>,
}

impl PollWorker {
    /// Build the worker and the handle for interactive triggers
    pub fn new(
        settings: SettingsHandle,
        feed: FeedSender,
        client: Arc<BackendClient>,
        dispatcher: Arc<PrintDispatcher>,
    ) -> (Self, PollHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PollState::Idle);
        (
            Self {
                settings,
                feed,
                client,
                dispatcher,
                commands: rx,
                state: state_tx,
            },
            PollHandle {
                commands: tx,
                state: state_rx,
            },
        )
    }

    fn set_state(&self, state: PollState) {
        let _ = self.state.send(state);
    }

    /// Drive the loop until shutdown
    pub async fn run(mut self, shutdown: CancellationToken) {
        tracing::info!("poll worker started");

        let mut ticker = self.new_ticker().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("poll worker shutting down");
                    break;
                }

                _ = ticker.tick() => {
                    self.check_cycle().await;
                }

                command = self.commands.recv() => {
                    let Some(command) = command else {
                        tracing::info!("command channel closed, poll worker stopping");
                        break;
                    };
                    match command {
                        PollCommand::CheckNow => self.check_cycle().await,
                        PollCommand::PrintOrder(id) => self.print_single(id).await,
                        PollCommand::PreviewOrder(id) => self.preview_single(id).await,
                        PollCommand::Reload => {
                            // the periodic timer stays paused while settings
                            // and the store list are refreshed, then restarts
                            self.reload().await;
                            ticker = self.new_ticker().await;
                        }
                        PollCommand::Cleanup => self.cleanup().await,
                    }
                }
            }
        }
    }

    /// Fresh interval from the current settings, immediate tick consumed
    async fn new_ticker(&self) -> tokio::time::Interval {
        let secs = self.settings.snapshot().await.poll_interval_secs.max(1);
        let mut ticker = tokio::time::interval(Duration::from_secs(secs));
        ticker.tick().await; // skip immediate tick
        ticker
    }

    /// One queue check: fetch waiting orders and dispatch the enabled kinds
    async fn check_cycle(&self) {
        self.set_state(PollState::Fetching);
        let queue = match self.client.get_waiting_orders(0).await {
            Ok(queue) => queue,
            Err(err) => {
                // configuration error; the client already raised the alert
                tracing::warn!("queue check skipped: {err}");
                self.set_state(PollState::Idle);
                return;
            }
        };

        self.feed.send(FeedEvent::LastChecked {
            waiting: queue.waiting,
            at: Local::now(),
        });

        self.set_state(PollState::Dispatching);
        let enabled = self.settings.snapshot().await.print_kinds;
        for order in &queue.lista {
            if enabled.contains(&order.kind) {
                self.dispatcher.print(order).await;
            } else {
                // not an error: this kind is just not enabled on this station
                tracing::debug!(order = %order.id, kind = ?order.kind, "kind disabled, skipping");
            }
        }
        self.set_state(PollState::Idle);
    }

    /// Fetch one order by id and print it.
    ///
    /// `requested` is captured up front so the not-found message always
    /// names the order the operator asked for.
    async fn print_single(&self, requested: OrderId) {
        self.set_state(PollState::Fetching);
        match self.client.get_order_by_id(requested).await {
            Ok(Some(order)) => {
                self.set_state(PollState::Dispatching);
                self.dispatcher.print(&order).await;
            }
            Ok(None) => {
                self.feed.status(format!(
                    "Erro ao imprimir [{requested}], pedido não encontrado."
                ));
            }
            Err(err) => tracing::warn!("single-order fetch skipped: {err}"),
        }
        self.set_state(PollState::Idle);
    }

    /// Fetch one order by id and render it for the preview pane only
    async fn preview_single(&self, requested: OrderId) {
        match self.client.get_order_by_id(requested).await {
            Ok(Some(order)) => {
                if let Err(err) = self.dispatcher.renderer().render(&order).await {
                    self.feed.status(format!(
                        "Erro ao visualizar pedido [{requested}]: {err}."
                    ));
                }
            }
            Ok(None) => {
                self.feed.status(format!(
                    "Erro ao visualizar pedido [{requested}]: pedido não encontrado."
                ));
            }
            Err(err) => tracing::warn!("preview fetch skipped: {err}"),
        }
    }

    /// Reload settings from the environment and refresh the store list
    async fn reload(&self) {
        tracing::info!("reloading configuration");
        let mut fresh = Settings::from_env();

        match self.client.get_stores().await {
            Ok(stores) => fresh.stores = stores,
            Err(err) => {
                // keep the cached list rather than dropping to nothing
                tracing::warn!("store refresh skipped: {err}");
                fresh.stores = self.settings.snapshot().await.stores;
            }
        }

        self.settings.apply(fresh).await;

        // show the backend profile page so the operator sees which system
        // this relay is connected to
        if let Ok(base) = self.client.base_url().await {
            self.feed
                .preview(PreviewTarget::Url(comanda_client::profile_url(&base)));
        }
    }

    /// Sweep the artifact directory
    async fn cleanup(&self) {
        let dir = self.settings.snapshot().await.artifact_dir;
        let report = janitor::cleanup(&dir, &self.feed).await;
        tracing::info!(
            deleted = report.deleted,
            failed = report.failed,
            "artifact cleanup finished"
        );
    }
}
