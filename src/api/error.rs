use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::{ErrorResponse, SERVICE_NAME};
use crate::logs::{LogError, StoreError};

pub const PERSISTENCE_FAILURE_MESSAGE: &str = "Failed to save log entry";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidPayload(String),
    #[error("Payload exceeds limit of {0} bytes")]
    PayloadTooLarge(usize),
    #[error("{}", PERSISTENCE_FAILURE_MESSAGE)]
    Persistence(#[source] StoreError),
    #[error("Internal server error")]
    Internal(String),
    #[error("Endpoint not found")]
    NotFound { path: String, method: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidPayload(_) => "INVALID_PAYLOAD",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::Persistence(_) => "PERSISTENCE_FAILED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::NotFound { .. } => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        match &self {
            ApiError::Persistence(source) => {
                tracing::error!(code = self.code(), error = %source, "Request failed")
            }
            ApiError::Internal(details) => {
                tracing::error!(code = self.code(), %details, "Request failed")
            }
            _ => tracing::debug!(code = self.code(), error = %self, "Request rejected"),
        }

        let mut body = ErrorResponse {
            error: self.to_string(),
            details: None,
            service: SERVICE_NAME,
            path: None,
            method: None,
        };
        match self {
            ApiError::Internal(details) => body.details = Some(details),
            ApiError::NotFound { path, method } => {
                body.path = Some(path);
                body.method = Some(method);
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

impl From<LogError> for ApiError {
    fn from(value: LogError) -> Self {
        match value {
            LogError::Validation(message) => ApiError::InvalidPayload(message),
            LogError::Persistence(source) => ApiError::Persistence(source),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::InvalidPayload(format!("Invalid JSON body: {}", value))
    }
}
