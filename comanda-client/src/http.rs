//! Backend HTTP access
//!
//! One JSON request primitive carrying the retry policy, plus the typed
//! webservice calls built on top of it. The policy is deliberately blunt:
//! every failure class (DNS, timeout, bad status, bad JSON) gets the same
//! fixed wait and retry, and exhaustion returns whatever was last seen
//! instead of an error. Callers must treat an empty value as a soft
//! failure.

use crate::endpoint::{self, EndpointError};
use crate::error::ClientResult;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::{Value, json};
use shared::feed::FeedSender;
use shared::models::{Order, OrderId, Store, WaitingQueue};
use shared::settings::SettingsHandle;
use std::time::Duration;
use tokio::sync::watch;

/// User agent the backend expects on webservice calls
const WEBSERVICE_AGENT: &str = "Postman";

/// Per-attempt request timeout
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the order-management webservices
pub struct BackendClient {
    http: reqwest::Client,
    settings: SettingsHandle,
    feed: FeedSender,
    busy: watch::Sender<bool>,
}

impl BackendClient {
    pub fn new(settings: SettingsHandle, feed: FeedSender) -> Self {
        let http = reqwest::Client::builder()
            .timeout(ATTEMPT_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        let (busy, _) = watch::channel(false);

        Self {
            http,
            settings,
            feed,
            busy,
        }
    }

    /// Busy flag for the cosmetic progress indicator
    pub fn busy_signal(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    /// Current normalized base URL
    pub async fn base_url(&self) -> ClientResult<String> {
        let settings = self.settings.snapshot().await;
        Ok(endpoint::normalize(&settings.host)?)
    }

    /// Issue a JSON request against `path` under the current base URL.
    ///
    /// An unconfigured host aborts before any network attempt and raises
    /// the operator alert. Otherwise the request is attempted up to the
    /// configured retry count, sleeping the fixed backoff between
    /// failures; when every attempt fails the last-seen value (`Null`) is
    /// returned as success.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Value,
        headers: HeaderMap,
    ) -> ClientResult<Value> {
        let settings = self.settings.snapshot().await;

        let base = match endpoint::normalize(&settings.host) {
            Ok(base) => base,
            Err(err @ EndpointError::Missing) => {
                self.feed.alert(
                    "Erro 400",
                    "Caminho do sistema indefinido, informe a\nURL do seu sistema para utilizar o serviço.",
                );
                return Err(err.into());
            }
        };
        let url = format!("{base}{path}");
        let attempts = settings.retry_count.max(1);
        let backoff = Duration::from_secs(settings.backoff_secs);

        self.set_busy(true);
        let mut data = Value::Null;
        for attempt in 1..=attempts {
            match self.attempt(method.clone(), &url, &payload, &headers).await {
                Ok(value) => {
                    data = value;
                    break;
                }
                Err(err) => {
                    tracing::error!(attempt, url = %url, "impossible to get a response from the server: {err}");
                    if attempt < attempts {
                        tracing::warn!(backoff_secs = backoff.as_secs(), "waiting before retry");
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }
        self.set_busy(false);

        Ok(data)
    }

    async fn attempt(
        &self,
        method: Method,
        url: &str,
        payload: &Value,
        headers: &HeaderMap,
    ) -> Result<Value, reqwest::Error> {
        let response = self
            .http
            .request(method, url)
            .headers(headers.clone())
            .json(payload)
            .send()
            .await?;

        response.json().await
    }

    fn set_busy(&self, busy: bool) {
        let _ = self.busy.send(busy);
        self.feed.progress(busy);
    }

    // ========== Webservice calls ==========

    /// Fetch one order by id; `None` when the backend has no match
    pub async fn get_order_by_id(&self, id: OrderId) -> ClientResult<Option<Order>> {
        let data = self
            .request(
                Method::POST,
                "/webservices/pedidos/",
                json!({ "id": id.0 }),
                webservice_headers(),
            )
            .await?;

        Ok(decode_order(data.get("data")))
    }

    /// Fetch the full store list
    pub async fn get_stores(&self) -> ClientResult<Vec<Store>> {
        let data = self
            .request(
                Method::POST,
                "/webservices/lojas/",
                json!({ "listar": "todos" }),
                webservice_headers(),
            )
            .await?;

        let stores = data
            .get("data")
            .cloned()
            .map(|value| serde_json::from_value(value).unwrap_or_default())
            .unwrap_or_default();
        Ok(stores)
    }

    /// Fetch the waiting queue for `store_id`, falling back to the
    /// configured store when `store_id` is not positive.
    ///
    /// Decoding problems degrade to the empty queue.
    pub async fn get_waiting_orders(&self, store_id: i64) -> ClientResult<WaitingQueue> {
        let id_loja = if store_id > 0 {
            store_id
        } else {
            self.settings.snapshot().await.store_id()
        };

        let data = self
            .request(
                Method::POST,
                "/webservices/pedidos/",
                json!({ "listar": "queue", "id_loja": id_loja }),
                webservice_headers(),
            )
            .await?;

        let queue = data
            .get("data")
            .cloned()
            .map(|value| serde_json::from_value(value).unwrap_or_default())
            .unwrap_or_default();
        Ok(queue)
    }
}

fn webservice_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(WEBSERVICE_AGENT));
    headers
}

/// The lookup endpoint answers with an object, a one-element list or
/// nothing at all, depending on the backend version.
fn decode_order(data: Option<&Value>) -> Option<Order> {
    let value = match data? {
        Value::Array(items) => items.first()?,
        value @ Value::Object(_) => value,
        _ => return None,
    };
    serde_json::from_value(value.clone()).ok()
}

// ========== Document URLs ==========

/// Remote print view for an order
pub fn print_view_url(base: &str, id: OrderId, template: &str) -> String {
    format!("{base}/views/print/?id={id}&template={template}")
}

/// Print view with the download flag, used by the external fetch tool
pub fn download_url(base: &str, id: OrderId, template: &str) -> String {
    format!("{}&download", print_view_url(base, id, template))
}

/// Backend profile page, previewed after a reload
pub fn profile_url(base: &str) -> String {
    format!("{base}/profile.php")
}
