//! API utility functions
//!
//! Pure helpers for HTTP request processing, shared by both handlers.

use axum::http::Method;
use http_body_util::{BodyExt, Limited};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::error::ApiError;

const NOT_AN_OBJECT: &str = "request body must be a JSON object";

/// Both handlers only accept POST
pub fn ensure_post(method: &Method) -> Result<(), ApiError> {
    if method == Method::POST {
        Ok(())
    } else {
        Err(ApiError::MethodNotAllowed)
    }
}

/// Read the whole body, rejecting anything above `max_size` bytes
pub async fn read_body(body: axum::body::Body, max_size: usize) -> Result<Vec<u8>, ApiError> {
    let collected = Limited::new(body, max_size).collect().await.map_err(|err| {
        if err.is::<http_body_util::LengthLimitError>() {
            ApiError::BadRequest(format!("request body exceeds {max_size} bytes"))
        } else {
            ApiError::BadRequest(format!("could not read request body: {err}"))
        }
    })?;

    Ok(collected.to_bytes().to_vec())
}

/// Parse a JSON object body. An empty body counts as `{}`.
///
/// Syntax errors and non-object bodies share one message; a well-formed
/// object with a mistyped field reports the field problem instead.
pub fn parse_json_body<T>(data: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let value = serde_json::from_slice::<Value>(data)
        .ok()
        .filter(Value::is_object)
        .ok_or_else(|| ApiError::BadRequest(NOT_AN_OBJECT.to_string()))?;

    serde_json::from_value(value)
        .map_err(|err| ApiError::BadRequest(format!("invalid request body: {err}")))
}

/// Treat whitespace-only strings as absent
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{DownloadRequest, MetadataRequest};

    #[test]
    fn test_ensure_post() {
        assert!(ensure_post(&Method::POST).is_ok());
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH, Method::OPTIONS] {
            assert!(matches!(ensure_post(&method), Err(ApiError::MethodNotAllowed)));
        }
    }

    #[tokio::test]
    async fn test_read_body_within_limit() {
        let body = axum::body::Body::from(r#"{"video_url":"x"}"#);
        let data = read_body(body, 1024).await.unwrap();
        assert_eq!(data, br#"{"video_url":"x"}"#);
    }

    #[tokio::test]
    async fn test_read_body_too_large() {
        let body = axum::body::Body::from(vec![b'a'; 2048]);
        let result = read_body(body, 1024).await;
        match result {
            Err(ApiError::BadRequest(message)) => assert!(message.contains("1024")),
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_body_as_default() {
        let req: MetadataRequest = parse_json_body(b"").unwrap();
        assert!(req.video_url.is_none());

        let req: DownloadRequest = parse_json_body(b"  \n").unwrap();
        assert!(req.media_id.is_none());
    }

    #[test]
    fn test_parse_malformed_body() {
        let result: Result<MetadataRequest, _> = parse_json_body(b"{not json");
        assert!(matches!(result, Err(ApiError::BadRequest(_))));

        let result: Result<MetadataRequest, _> = parse_json_body(b"[1, 2]");
        match result {
            Err(ApiError::BadRequest(message)) => assert_eq!(message, NOT_AN_OBJECT),
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_mistyped_field() {
        let result: Result<MetadataRequest, _> = parse_json_body(br#"{"video_url": 123}"#);
        match result {
            Err(ApiError::BadRequest(message)) => {
                assert!(message.starts_with("invalid request body:"), "{message}");
                assert!(message.contains("expected a string"), "{message}");
            }
            other => panic!("Expected BadRequest, got {:?}", other),
        }

        let result: Result<DownloadRequest, _> = parse_json_body(br#"{"media_id": 1.5}"#);
        match result {
            Err(ApiError::BadRequest(message)) => {
                assert!(message.starts_with("invalid request body:"), "{message}")
            }
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some(" https://x ".to_string())).as_deref(), Some("https://x"));
        assert!(non_blank(Some("   ".to_string())).is_none());
        assert!(non_blank(None).is_none());
    }
}
