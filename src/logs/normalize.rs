//! Turns an arbitrary inbound JSON payload into a canonical [`LogEntry`].
//!
//! The only accepted shape is an object carrying both a `request` and a
//! `response` member. Every sub-field is optional and falls back to its empty
//! value; nothing else is validated.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::LogError;
use super::models::{
    EntryId, EntryKind, HeadersMap, LogEntry, RequestRecord, ResponseRecord, headers_from_json,
    render_json, status_from_json,
};

pub const INVALID_FORMAT_MESSAGE: &str =
    "Invalid log format. Provide both \"request\" and \"response\" fields";

/// Normalize `payload` using a fresh UUIDv7 id and the current time
pub fn normalize(payload: &Value) -> Result<LogEntry, LogError> {
    normalize_with(payload, EntryId::Text(Uuid::now_v7().to_string()), Utc::now())
}

/// Normalize with an explicit id and timestamp
pub fn normalize_with(
    payload: &Value,
    id: EntryId,
    timestamp: DateTime<Utc>,
) -> Result<LogEntry, LogError> {
    let (request, response) = match (payload.get("request"), payload.get("response")) {
        (Some(request), Some(response)) if is_truthy(request) && is_truthy(response) => {
            (request, response)
        }
        _ => return Err(LogError::Validation(INVALID_FORMAT_MESSAGE.to_string())),
    };

    let empty = Map::new();
    let request = request.as_object().unwrap_or(&empty);
    let response = response.as_object().unwrap_or(&empty);

    Ok(LogEntry {
        id,
        kind: EntryKind::KongRequestResponse,
        timestamp,
        request: RequestRecord {
            url: text_field(request.get("url")),
            method: text_field(request.get("method")),
            headers: headers_field(request.get("headers")),
            body: text_field(request.get("body")),
        },
        response: ResponseRecord {
            status_code: status_field(response.get("status_code")),
            headers: headers_field(response.get("headers")),
            body: text_field(response.get("body")),
        },
    })
}

/// JSON truthiness: `null`, `false`, zero and the empty string are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(v) if is_truthy(v) => render_json(v),
        _ => String::new(),
    }
}

fn status_field(value: Option<&Value>) -> i64 {
    value.map(status_from_json).unwrap_or(0)
}

fn headers_field(value: Option<&Value>) -> HeadersMap {
    value.map(headers_from_json).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::models::HeaderValue;
    use serde_json::json;

    fn normalize_fixed(payload: Value) -> Result<LogEntry, LogError> {
        normalize_with(&payload, EntryId::Text("fixed-id".to_string()), Utc::now())
    }

    #[test]
    fn test_minimal_payload_gets_defaults() {
        let entry = normalize_fixed(json!({
            "request": {"url": "/x", "method": "GET"},
            "response": {"status_code": 200}
        }))
        .unwrap();

        assert_eq!(entry.id.to_string(), "fixed-id");
        assert_eq!(entry.kind, EntryKind::KongRequestResponse);
        assert_eq!(entry.request.url, "/x");
        assert_eq!(entry.request.method, "GET");
        assert_eq!(entry.request.body, "");
        assert!(entry.request.headers.is_empty());
        assert_eq!(entry.response.status_code, 200);
        assert!(entry.response.headers.is_empty());
        assert_eq!(entry.response.body, "");
    }

    #[test]
    fn test_empty_sub_objects_are_accepted() {
        let entry = normalize_fixed(json!({"request": {}, "response": {}})).unwrap();

        assert_eq!(entry.request, RequestRecord::default());
        assert_eq!(entry.response, ResponseRecord::default());
    }

    #[test]
    fn test_message_only_payload_is_rejected() {
        let err = normalize_fixed(json!({"message": "hello"})).unwrap_err();
        assert!(matches!(err, LogError::Validation(ref msg) if msg == INVALID_FORMAT_MESSAGE));
    }

    #[test]
    fn test_missing_or_falsy_halves_are_rejected() {
        for payload in [
            json!({"request": {"url": "/x"}}),
            json!({"response": {"status_code": 200}}),
            json!({"request": null, "response": {}}),
            json!({"request": {}, "response": false}),
            json!({"request": "", "response": {}}),
            json!({"request": {}, "response": 0}),
            json!([{"request": {}, "response": {}}]),
            json!("request"),
            Value::Null,
        ] {
            assert!(
                matches!(normalize_fixed(payload.clone()), Err(LogError::Validation(_))),
                "payload should be rejected: {payload}"
            );
        }
    }

    #[test]
    fn test_headers_keep_single_and_multi_values() {
        let entry = normalize_fixed(json!({
            "request": {
                "headers": {
                    "host": "api.local",
                    "x-forwarded-for": ["10.0.0.1", "10.0.0.2"],
                    "content-length": 42
                }
            },
            "response": {"headers": {"x-kong-upstream-latency": "7"}}
        }))
        .unwrap();

        let headers = &entry.request.headers;
        assert_eq!(headers["host"], HeaderValue::Single("api.local".into()));
        assert_eq!(
            headers["x-forwarded-for"],
            HeaderValue::Multi(vec!["10.0.0.1".into(), "10.0.0.2".into()])
        );
        assert_eq!(headers["content-length"], HeaderValue::Single("42".into()));
        assert_eq!(entry.response.headers.len(), 1);
    }

    #[test]
    fn test_non_object_headers_default_to_empty() {
        let entry = normalize_fixed(json!({
            "request": {"headers": "host: x"},
            "response": {"headers": ["a"]}
        }))
        .unwrap();

        assert!(entry.request.headers.is_empty());
        assert!(entry.response.headers.is_empty());
    }

    #[test]
    fn test_status_code_coercion() {
        let status = |value: Value| {
            normalize_fixed(json!({"request": {}, "response": {"status_code": value}}))
                .unwrap()
                .response
                .status_code
        };

        assert_eq!(status(json!(404)), 404);
        assert_eq!(status(json!(502.9)), 502);
        assert_eq!(status(json!("201")), 201);
        assert_eq!(status(json!("oops")), 0);
        assert_eq!(status(json!(null)), 0);
        assert_eq!(status(json!(true)), 0);
    }

    #[test]
    fn test_non_string_bodies_are_rendered_as_json() {
        let entry = normalize_fixed(json!({
            "request": {"body": {"name": "widget"}, "method": 0},
            "response": {"body": [1, 2]}
        }))
        .unwrap();

        assert_eq!(entry.request.body, r#"{"name":"widget"}"#);
        assert_eq!(entry.request.method, "");
        assert_eq!(entry.response.body, "[1,2]");
    }

    #[test]
    fn test_truthy_scalar_halves_yield_empty_records() {
        let entry = normalize_fixed(json!({"request": "GET /", "response": 200})).unwrap();

        assert_eq!(entry.request, RequestRecord::default());
        assert_eq!(entry.response, ResponseRecord::default());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let payload = json!({"request": {}, "response": {}});
        let ids: std::collections::HashSet<_> = (0..1000)
            .map(|_| normalize(&payload).unwrap().id)
            .collect();
        assert_eq!(ids.len(), 1000);
    }
}
