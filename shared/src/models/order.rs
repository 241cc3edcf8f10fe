//! Order model
//!
//! Orders arrive from the backend queue and lookup endpoints. Only the
//! identifier and the delivery flag are interpreted here; every other
//! backend field is carried opaquely for the rendering backend to use.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Order identifier, immutable once fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OrderId(pub i64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        lenient_i64(&value)
            .map(OrderId)
            .ok_or_else(|| D::Error::custom(format!("invalid order id: {value}")))
    }
}

/// Which document template an order uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Picked up at the counter
    Counter,
    /// Delivered to the customer
    Delivery,
}

/// One order as returned by the backend
///
/// The backend is not strict about JSON types: `id` and `delivery` may
/// arrive as numbers or numeric strings, so both are decoded leniently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(
        rename = "delivery",
        deserialize_with = "de_kind",
        serialize_with = "ser_kind"
    )]
    pub kind: OrderKind,
    /// Backend fields this relay does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Waiting-orders queue for one store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaitingQueue {
    /// Orders still waiting on the backend
    #[serde(default)]
    pub waiting: u64,
    /// The waiting orders themselves
    #[serde(default)]
    pub lista: Vec<Order>,
}

/// Decode an integer that may arrive as a JSON number, numeric string or bool
pub(crate) fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn de_kind<'de, D>(deserializer: D) -> Result<OrderKind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let flag = lenient_i64(&value)
        .ok_or_else(|| D::Error::custom(format!("invalid delivery flag: {value}")))?;
    Ok(if flag != 0 {
        OrderKind::Delivery
    } else {
        OrderKind::Counter
    })
}

fn ser_kind<S>(kind: &OrderKind, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(match kind {
        OrderKind::Counter => 0,
        OrderKind::Delivery => 1,
    })
}
