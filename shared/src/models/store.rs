//! Store model

use super::lenient_i64;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A fulfillment location returned by the backend
///
/// The selected store scopes which waiting orders this relay polls for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(deserialize_with = "de_id")]
    pub id: i64,
    #[serde(rename = "nome", default)]
    pub name: String,
}

fn de_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    lenient_i64(&value).ok_or_else(|| D::Error::custom(format!("invalid store id: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_shape() {
        let store: Store =
            serde_json::from_value(serde_json::json!({"id": "12", "nome": "Matriz"})).unwrap();
        assert_eq!(store, Store { id: 12, name: "Matriz".into() });
    }
}
