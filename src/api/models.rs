//! API models for the vidgrab HTTP endpoints.
//!
//! - `POST /get-video-metadata` accepts a [`MetadataRequest`] and answers with
//!   [`VideoInfo`](crate::media::VideoInfo)
//! - `POST /download-video` accepts a [`DownloadRequest`] and answers with
//!   [`DownloadResponse`]
//! - every failure is an [`ErrorResponse`]
//!
//! # Download request
//!
//! ```json
//! { "video_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ" }
//! ```
//!
//! or, resolving the URL from the media library:
//!
//! ```json
//! { "media_id": "6f1c2a8e-8d3b-4f7a-9d3e-2f1b0c9a7e11" }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct MetadataRequest {
    #[serde(default)]
    pub video_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct DownloadRequest {
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub media_id: Option<MediaId>,
}

/// Media library identifier; clients send either strings or integers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MediaId {
    Text(String),
    Number(i64),
}

impl MediaId {
    pub fn is_blank(&self) -> bool {
        matches!(self, MediaId::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaId::Text(text) => f.write_str(text.trim()),
            MediaId::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DownloadResponse {
    pub download_url: String,
    pub filename: String,
    pub size: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: BTreeMap<String, String>,
    pub version: String,
}
