//! API utility functions
//!
//! Stateless helpers for HTTP request processing, kept apart from the
//! handlers so they can be unit tested.

use axum::body::Body;
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::api::error::ApiError;

/// Parses and validates Content-Type header for application/json
///
/// Accepts:
/// - `application/json`
/// - `application/json; charset=utf-8`
///
/// Rejects:
/// - `application/jsonp`
/// - `application/json-patch+json`
/// - `text/json`
/// - Malformed media types
pub fn parse_content_type(content_type: &str) -> Result<mime::Mime, ApiError> {
    let media_type: mime::Mime = content_type.parse().map_err(|_| {
        ApiError::InvalidPayload(format!("invalid Content-Type: {}", content_type))
    })?;

    if media_type.type_() != mime::APPLICATION || media_type.subtype() != mime::JSON {
        return Err(ApiError::InvalidPayload(format!(
            "Content-Type must be application/json, got: {}/{}",
            media_type.type_(),
            media_type.subtype()
        )));
    }

    Ok(media_type)
}

/// Collects the request body, failing once it grows past `max_size` bytes
///
/// Runs after `RequestDecompressionLayer`, so the limit applies to the
/// decompressed payload.
pub async fn read_body(body: Body, max_size: usize) -> Result<Vec<u8>, ApiError> {
    let collected = Limited::new(body, max_size).collect().await.map_err(|err| {
        if err.downcast_ref::<LengthLimitError>().is_some() {
            ApiError::PayloadTooLarge(max_size)
        } else {
            ApiError::Internal(err.to_string())
        }
    })?;

    Ok(collected.to_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_type_valid() {
        assert!(parse_content_type("application/json").is_ok());
        assert!(parse_content_type("application/json; charset=utf-8").is_ok());
        assert!(parse_content_type("application/json; charset=UTF-8").is_ok());
    }

    #[test]
    fn test_parse_content_type_invalid() {
        assert!(parse_content_type("application/jsonp").is_err());
        assert!(parse_content_type("application/json-patch+json").is_err());
        assert!(parse_content_type("text/json").is_err());
        assert!(parse_content_type("text/plain").is_err());
        assert!(parse_content_type("invalid").is_err());
        assert!(parse_content_type("").is_err());
    }

    #[tokio::test]
    async fn test_read_body_within_limit() {
        let data = read_body(Body::from(vec![7u8; 1000]), 1000).await.unwrap();
        assert_eq!(data.len(), 1000);

        let empty = read_body(Body::empty(), 10).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_read_body_too_large() {
        let result = read_body(Body::from(vec![0u8; 1001]), 1000).await;
        match result {
            Err(ApiError::PayloadTooLarge(limit)) => assert_eq!(limit, 1000),
            other => panic!("Expected PayloadTooLarge error, got {other:?}"),
        }
    }
}
