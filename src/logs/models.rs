//! Canonical log entry records as persisted to the backing file.
//!
//! A stored collection looks like this (newest first):
//!
//! ```json
//! [
//!   {
//!     "id": "0190a1e2-7c4b-7d3e-9a51-5f2c0e6b1a77",
//!     "type": "kong_request_response",
//!     "timestamp": "2024-05-01T10:00:00.123Z",
//!     "request": {
//!       "url": "/orders",
//!       "method": "GET",
//!       "headers": { "accept": "application/json", "x-forwarded-for": ["10.0.0.1", "10.0.0.2"] },
//!       "body": ""
//!     },
//!     "response": {
//!       "status_code": 200,
//!       "headers": {},
//!       "body": "{\"ok\":true}"
//!     }
//!   }
//! ]
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub type HeadersMap = BTreeMap<String, HeaderValue>;

/// Ordered sequence of entries, newest first
pub type LogCollection = Vec<LogEntry>;

/// Entry identifier
///
/// New entries get a UUID string. Collections written by older deployments
/// carry numeric ids, which are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Text(id) => f.write_str(id),
            EntryId::Number(id) => write!(f, "{id}"),
        }
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        EntryId::Text(value)
    }
}

/// A header carries either a single value or a list of repeated values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Single(String),
    Multi(Vec<String>),
}

impl HeaderValue {
    /// Arrays become `Multi`; any other JSON value is rendered to a `Single`
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => HeaderValue::Multi(items.iter().map(render_json).collect()),
            other => HeaderValue::Single(render_json(other)),
        }
    }
}

impl<'de> Deserialize<'de> for HeaderValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(|value| HeaderValue::from_json(&value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Request/response pair reported by a gateway logging plugin
    KongRequestResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: EntryId,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(with = "iso8601_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub request: RequestRecord,
    #[serde(default)]
    pub response: ResponseRecord,
}

// Stored records are read leniently: a field holding an unexpected JSON type
// is coerced rather than failing the whole collection.

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub method: String,
    #[serde(default, deserialize_with = "lenient::headers")]
    pub headers: HeadersMap,
    #[serde(default, deserialize_with = "lenient::text")]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseRecord {
    #[serde(default, deserialize_with = "lenient::status")]
    pub status_code: i64,
    #[serde(default, deserialize_with = "lenient::headers")]
    pub headers: HeadersMap,
    #[serde(default, deserialize_with = "lenient::text")]
    pub body: String,
}

/// Strings verbatim, `null` as empty, everything else as compact JSON text
pub fn render_json(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Integers as-is, floats truncated, numeric strings parsed, anything else 0
pub fn status_from_json(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Header objects map name by name; anything that is not an object is empty
pub fn headers_from_json(value: &Value) -> HeadersMap {
    let Value::Object(map) = value else {
        return HeadersMap::new();
    };

    map.iter()
        .map(|(name, value)| (name.clone(), HeaderValue::from_json(value)))
        .collect()
}

mod lenient {
    use super::{HeadersMap, headers_from_json, render_json, status_from_json};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Value::deserialize(deserializer).map(|v| render_json(&v))
    }

    pub fn status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Value::deserialize(deserializer).map(|v| status_from_json(&v))
    }

    pub fn headers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HeadersMap, D::Error> {
        Value::deserialize(deserializer).map(|v| headers_from_json(&v))
    }
}

/// RFC 3339 timestamps with millisecond precision and a `Z` suffix
mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
