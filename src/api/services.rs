use std::any::Any;
use std::collections::HashMap;

use axum::{
    Json,
    extract::{OriginalUri, Query, State, rejection::QueryRejection},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use super::{
    error::ApiError,
    models::{
        HealthResponse, LOG_ACCEPTED_MESSAGE, LogAcceptedResponse, LogsQuery, LogsResponse,
        SERVICE_NAME,
    },
    state::AppState,
};
use crate::logs::{LogError, service::INVALID_LIMIT_MESSAGE};

/// Log ingestion endpoint (POST /logs)
///
/// ## Flow:
/// 1. Require a JSON Content-Type
/// 2. Read the body (already decompressed), bounded by `server.max_body_bytes`
/// 3. Parse JSON and hand the payload to the log service, which normalizes,
///    prepends and saves the whole collection under its write lock
/// 4. Return 201 with the stored entry and the new collection size
///
/// Rejected payloads map to 400, save failures to 500.
pub async fn ingest_log(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::InvalidPayload("missing Content-Type header".into()))?;
    super::utils::parse_content_type(content_type)?;

    let body_bytes = super::utils::read_body(body, state.config.server.max_body_bytes).await?;

    let payload: Value = serde_json::from_slice(&body_bytes).inspect_err(|_| {
        state.metrics.entry_rejected();
    })?;

    let ingested = state.logs.ingest(&payload).await.map_err(|err| {
        match &err {
            LogError::Validation(_) => state.metrics.entry_rejected(),
            LogError::Persistence(_) => state.metrics.persist_failed(),
        }
        ApiError::from(err)
    })?;

    state.metrics.entry_ingested();

    let response = LogAcceptedResponse {
        success: true,
        message: LOG_ACCEPTED_MESSAGE.to_string(),
        log_entry: ingested.entry,
        total_logs: ingested.total,
        service: SERVICE_NAME.to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Log retrieval endpoint (GET /logs?limit=N)
///
/// Returns the newest `limit` entries (default from `logs.default_limit`)
/// together with the full collection size.
pub async fn list_logs(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // e.g. a query string that is not valid UTF-8 once decoded
    let Query(pairs) =
        query.map_err(|_| ApiError::InvalidPayload(INVALID_LIMIT_MESSAGE.to_string()))?;
    let query = LogsQuery::from_pairs(pairs);

    let page = state.logs.retrieve(query.limit.as_deref()).await?;
    state.metrics.page_served();

    let response = LogsResponse {
        logs: page.entries,
        total_logs: page.total,
        returned_logs: page.returned,
        limit: page.limit,
        service: SERVICE_NAME.to_string(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Health check endpoint (GET /health)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let mut components = HashMap::new();
    components.insert("api".to_string(), "healthy".to_string());
    components.insert("log_store".to_string(), "healthy".to_string());

    let response = HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME,
        components,
        log_store: state.logs.store().describe(),
        uptime_seconds: state.started_at.elapsed().as_secs_f64(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        metrics: state.metrics.snapshot(),
    };

    (StatusCode::OK, Json(response))
}

/// Fallback for unknown routes
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound {
        path: uri.to_string(),
        method: method.to_string(),
    }
}

/// Turns a handler panic into the generic 500 body so the server keeps serving
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::Internal(details).into_response()
}
