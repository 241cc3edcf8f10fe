//! Shared types for the comanda print relay
//!
//! Domain models, process settings and the status-feed event types used
//! across the client, printer and relay crates.

pub mod feed;
pub mod models;
pub mod settings;

// Re-exports
pub use feed::{FeedEvent, FeedSender, PreviewTarget, strip_markup};
pub use models::{Order, OrderId, OrderKind, Store, TemplateCatalog, WaitingQueue};
pub use settings::{Settings, SettingsHandle};
