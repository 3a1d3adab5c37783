use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;

pub const METADATA_FAILURE_PREFIX: &str = "could not fetch video metadata.";
pub const METADATA_UNHANDLED: &str =
    "could not fetch video metadata. check the URL or try again.";
pub const DOWNLOAD_FAILURE_PREFIX: &str = "error downloading video:";
pub const DOWNLOAD_UNHANDLED: &str = "could not download the video. try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("method not allowed, use POST")]
    MethodNotAllowed,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    ExtractionFailure(String),
    #[error("could not download the video")]
    DownloadFailed,
    #[error("{0}")]
    Internal(String),
    /// Only `public` reaches the client; `detail` is logged
    #[error("{public}")]
    Unhandled { public: &'static str, detail: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest(_) | ApiError::ExtractionFailure(_) => StatusCode::BAD_REQUEST,
            ApiError::DownloadFailed | ApiError::Internal(_) | ApiError::Unhandled { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn unhandled(public: &'static str, detail: impl std::fmt::Display) -> Self {
        ApiError::Unhandled {
            public,
            detail: detail.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        match &self {
            ApiError::Unhandled { detail, .. } => {
                tracing::error!(error = %detail, "Unhandled error while processing request");
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
            }
            _ => tracing::debug!(%status, error = %self, "Request rejected"),
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Friendlier text for extractor failures seen by the metadata handler
pub fn metadata_failure_message(raw: &str) -> String {
    let lower = raw.to_lowercase();

    let detail = if raw.contains("Private video") || raw.contains("Sign in") {
        "This video is private or requires login."
    } else if lower.contains("unavailable") {
        "This video is unavailable or removed."
    } else if lower.contains("region") || lower.contains("country") {
        "This video is not available in your region."
    } else {
        raw
    };

    format!("{METADATA_FAILURE_PREFIX} {detail}")
}

/// Friendlier text for extractor failures seen by the download handler
pub fn download_failure_message(raw: &str) -> String {
    let detail = if raw.contains("Private video") {
        "this is a private video and cannot be downloaded."
    } else if raw.contains("Video unavailable") {
        "video not available."
    } else {
        raw
    };

    format!("{DOWNLOAD_FAILURE_PREFIX} {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::ExtractionFailure("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::DownloadFailed.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::unhandled(DOWNLOAD_UNHANDLED, "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unhandled_hides_detail() {
        let err = ApiError::unhandled(METADATA_UNHANDLED, "connection reset by peer at 10.0.0.3");
        assert_eq!(err.to_string(), METADATA_UNHANDLED);
    }

    #[test]
    fn test_metadata_failure_private() {
        let msg = metadata_failure_message("ERROR: [youtube] abc: Private video. Sign in if you've been granted access");
        assert_eq!(
            msg,
            "could not fetch video metadata. This video is private or requires login."
        );

        let msg = metadata_failure_message("ERROR: Sign in to confirm your age");
        assert!(msg.contains("private or requires login"));
    }

    #[test]
    fn test_metadata_failure_unavailable_is_case_insensitive() {
        let msg = metadata_failure_message("ERROR: [youtube] abc: Video unavailable");
        assert!(msg.ends_with("This video is unavailable or removed."));

        let msg = metadata_failure_message("ERROR: This content is UNAVAILABLE");
        assert!(msg.ends_with("This video is unavailable or removed."));
    }

    #[test]
    fn test_metadata_failure_region() {
        let msg = metadata_failure_message("ERROR: The uploader has not made this video available in your Country");
        assert!(msg.ends_with("This video is not available in your region."));

        let msg = metadata_failure_message("ERROR: blocked in this Region");
        assert!(msg.ends_with("This video is not available in your region."));
    }

    #[test]
    fn test_metadata_failure_passthrough() {
        let msg = metadata_failure_message("ERROR: Unsupported URL: https://example.com");
        assert_eq!(
            msg,
            "could not fetch video metadata. ERROR: Unsupported URL: https://example.com"
        );
    }

    #[test]
    fn test_download_failure_messages() {
        assert_eq!(
            download_failure_message("ERROR: [youtube] abc: Private video"),
            "error downloading video: this is a private video and cannot be downloaded."
        );
        assert_eq!(
            download_failure_message("ERROR: [youtube] abc: Video unavailable"),
            "error downloading video: video not available."
        );
        // Only the exact phrase is recognized here
        assert_eq!(
            download_failure_message("ERROR: video is unavailable"),
            "error downloading video: ERROR: video is unavailable"
        );
    }
}
