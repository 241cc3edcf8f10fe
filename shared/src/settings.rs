//! Process settings
//!
//! Every knob the relay reads lives here. The struct is plain data,
//! decoupled from any presentation layer; components receive a
//! [`SettingsHandle`] at construction and take snapshots when they need
//! values. Only [`SettingsHandle::apply`] writes, and only the reload flow
//! calls it.
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | BACKEND_HOST | (empty) | Raw backend host, scheme optional |
//! | STORE_NAME | (empty) | Active store name |
//! | PRINTER_NAME | (empty) | Destination printer |
//! | PRINT_COPIES | 1 | Copies per document |
//! | PRINT_KINDS | counter,delivery | Kinds printed automatically |
//! | COUNTER_TEMPLATE | (empty) | Template code for counter orders |
//! | DELIVERY_TEMPLATE | (empty) | Template code for delivery orders |
//! | ARTIFACT_DIR | ./artifacts | Rendered document directory |
//! | GS_COMMAND | gs / gswin64c | Rasterizer executable |
//! | GS_DEVICE | mswinpr2 | Rasterizer output device |
//! | FETCH_COMMAND | curl | External fetch tool |
//! | POLL_INTERVAL_SECS | 30 | Queue poll interval |
//! | RETRY_COUNT | 3 | Request attempts before giving up |
//! | RETRY_BACKOFF_SECS | 10 | Wait between failed attempts |

use crate::models::{OrderKind, Store, TemplateCatalog};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Raw backend host as typed by the operator (normalized per request)
    pub host: String,
    /// Active store name, resolved against `stores`
    pub store: String,
    /// Cached store list, refreshed by the reload flow
    pub stores: Vec<Store>,
    /// Destination printer name
    pub printer: String,
    /// Copies per document
    pub copies: u32,
    /// Order kinds printed automatically by the check cycle
    pub print_kinds: HashSet<OrderKind>,
    /// Active template code for counter orders
    pub counter_template: String,
    /// Active template code for delivery orders
    pub delivery_template: String,
    /// Known template label ↔ code pairs
    pub templates: TemplateCatalog,
    /// Directory holding rendered artifacts
    pub artifact_dir: PathBuf,
    /// Rasterizer/print-driver executable
    pub gs_command: String,
    /// Rasterizer output device
    pub gs_device: String,
    /// External fetch tool executable
    pub fetch_command: String,
    /// Queue poll interval in seconds
    pub poll_interval_secs: u64,
    /// Request attempts before giving up
    pub retry_count: u32,
    /// Wait between failed request attempts, in seconds
    pub backoff_secs: u64,
}

impl Settings {
    /// Load settings from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("BACKEND_HOST", defaults.host),
            store: env_or("STORE_NAME", defaults.store),
            stores: Vec::new(),
            printer: env_or("PRINTER_NAME", defaults.printer),
            copies: env_parse("PRINT_COPIES", defaults.copies),
            print_kinds: std::env::var("PRINT_KINDS")
                .map(|raw| parse_kinds(&raw))
                .unwrap_or(defaults.print_kinds),
            counter_template: env_or("COUNTER_TEMPLATE", defaults.counter_template),
            delivery_template: env_or("DELIVERY_TEMPLATE", defaults.delivery_template),
            templates: TemplateCatalog::default(),
            artifact_dir: std::env::var("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_dir),
            gs_command: env_or("GS_COMMAND", defaults.gs_command),
            gs_device: env_or("GS_DEVICE", defaults.gs_device),
            fetch_command: env_or("FETCH_COMMAND", defaults.fetch_command),
            poll_interval_secs: env_parse("POLL_INTERVAL_SECS", defaults.poll_interval_secs),
            retry_count: env_parse("RETRY_COUNT", defaults.retry_count),
            backoff_secs: env_parse("RETRY_BACKOFF_SECS", defaults.backoff_secs),
        }
    }

    /// Backend id of the active store, `0` when it cannot be resolved
    pub fn store_id(&self) -> i64 {
        self.stores
            .iter()
            .find(|store| store.name == self.store)
            .map_or(0, |store| store.id)
    }

    /// Active template code for an order kind
    pub fn template_for(&self, kind: OrderKind) -> &str {
        match kind {
            OrderKind::Counter => &self.counter_template,
            OrderKind::Delivery => &self.delivery_template,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: String::new(),
            store: String::new(),
            stores: Vec::new(),
            printer: String::new(),
            copies: 1,
            print_kinds: HashSet::from([OrderKind::Counter, OrderKind::Delivery]),
            counter_template: String::new(),
            delivery_template: String::new(),
            templates: TemplateCatalog::default(),
            artifact_dir: PathBuf::from("./artifacts"),
            gs_command: if cfg!(windows) { "gswin64c" } else { "gs" }.to_string(),
            gs_device: "mswinpr2".to_string(),
            fetch_command: "curl".to_string(),
            poll_interval_secs: 30,
            retry_count: 3,
            backoff_secs: 10,
        }
    }
}

/// Parse a comma-separated kind list (`counter,delivery`)
///
/// Unknown tokens are ignored with a warning rather than failing the load.
pub fn parse_kinds(raw: &str) -> HashSet<OrderKind> {
    let mut kinds = HashSet::new();
    for token in raw.split(',') {
        match token.trim().to_ascii_lowercase().as_str() {
            "" => {}
            "counter" | "0" => {
                kinds.insert(OrderKind::Counter);
            }
            "delivery" | "1" => {
                kinds.insert(OrderKind::Delivery);
            }
            other => tracing::warn!(token = other, "unknown print kind in PRINT_KINDS"),
        }
    }
    kinds
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

/// Shared, single-writer view of the process settings
///
/// Readers take cheap snapshots; the reload flow is the only writer.
#[derive(Debug, Clone)]
pub struct SettingsHandle(Arc<RwLock<Settings>>);

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self(Arc::new(RwLock::new(settings)))
    }

    /// Clone of the current settings
    pub async fn snapshot(&self) -> Settings {
        self.0.read().await.clone()
    }

    /// Replace the settings wholesale (the save operation)
    pub async fn apply(&self, settings: Settings) {
        *self.0.write().await = settings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kind_lists() {
        assert_eq!(
            parse_kinds("counter,delivery"),
            HashSet::from([OrderKind::Counter, OrderKind::Delivery])
        );
        assert_eq!(parse_kinds("delivery"), HashSet::from([OrderKind::Delivery]));
        assert_eq!(parse_kinds("bogus,"), HashSet::new());
    }

    #[test]
    fn resolves_store_id_by_name() {
        let settings = Settings {
            store: "Filial".into(),
            stores: vec![
                Store { id: 1, name: "Matriz".into() },
                Store { id: 2, name: "Filial".into() },
            ],
            ..Settings::default()
        };
        assert_eq!(settings.store_id(), 2);
    }

    #[test]
    fn unresolved_store_is_zero() {
        let settings = Settings::default();
        assert_eq!(settings.store_id(), 0);
    }

    #[tokio::test]
    async fn apply_replaces_snapshot() {
        let handle = SettingsHandle::new(Settings::default());
        let mut updated = handle.snapshot().await;
        updated.printer = "Térmica".into();
        handle.apply(updated).await;
        assert_eq!(handle.snapshot().await.printer, "Térmica");
    }
}
