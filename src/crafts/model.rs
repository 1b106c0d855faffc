use serde::Serialize;
use serde_json::{Map, Value};

/// Schemaless craft document as submitted by a client.
pub type Document = Map<String, Value>;

/// A stored craft: the client document plus the identity the store assigned.
/// Insertion order follows `id`.
#[derive(Debug, Clone, Serialize)]
pub struct CraftItem {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(flatten)]
    pub doc: Document,
}

impl CraftItem {
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.doc.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}
