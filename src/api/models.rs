//! Request and response bodies for the HTTP surface.
//!
//! - `POST /logs` returns [`LogAcceptedResponse`] (201)
//! - `GET /logs?limit=N` returns [`LogsResponse`] (200)
//! - failures return [`ErrorResponse`]
//!
//! Response keys are camelCase; the embedded [`LogEntry`] keeps its own
//! snake_case field names.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::logs::LogEntry;
use crate::observability::MetricsSnapshot;

/// Value of the `service` field on every response
pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

pub const LOG_ACCEPTED_MESSAGE: &str = "Log entry added successfully";

#[derive(Debug, Default)]
pub struct LogsQuery {
    pub limit: Option<String>,
}

impl LogsQuery {
    /// Repeated `limit` keys are joined with commas, so `?limit=5&limit=7`
    /// reads as `"5,7"` and its leading integer 5 applies.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let values: Vec<String> = pairs
            .into_iter()
            .filter(|(key, _)| key == "limit")
            .map(|(_, value)| value)
            .collect();

        Self {
            limit: (!values.is_empty()).then(|| values.join(",")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LogAcceptedResponse {
    pub success: bool,
    pub message: String,
    pub log_entry: LogEntry,
    pub total_logs: usize,
    pub service: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LogsResponse {
    pub logs: Vec<LogEntry>,
    pub total_logs: usize,
    pub returned_logs: usize,
    pub limit: u64,
    pub service: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub service: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: &'static str,
    pub components: HashMap<String, String>,
    pub log_store: String,
    pub uptime_seconds: f64,
    pub version: String,
    pub metrics: MetricsSnapshot,
}
