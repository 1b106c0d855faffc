use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::{Duration, OffsetDateTime};

/// JWT payload. Whatever identity object the client presented is carried
/// verbatim next to the server-owned timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub iat: i64, // issued at (unix timestamp)
    pub exp: i64, // expires at (unix timestamp)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Claims {
    pub fn new(mut fields: Map<String, Value>, issued_at: OffsetDateTime, ttl: Duration) -> Self {
        fields.remove("iat");
        fields.remove("exp");
        Self {
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + ttl).unix_timestamp(),
            fields,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.fields.get("email").and_then(Value::as_str)
    }
}
