//! Video extraction collaborator
//!
//! [`VideoExtractor`] resolves a page URL to metadata or downloads its media.
//! [`YtDlp`] drives the `yt-dlp` binary; tests substitute their own
//! implementation.

mod ytdlp;

pub use ytdlp::YtDlp;

use async_trait::async_trait;
use bon::Builder;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The extractor ran and reported that it could not handle the URL
    #[error("{0}")]
    Failed(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid extractor output: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}

/// Options passed to every extractor call
#[derive(Debug, Clone, Builder)]
pub struct ExtractOptions {
    #[builder(into)]
    pub user_agent: String,
    #[builder(default)]
    pub no_check_certificate: bool,
    /// Format selector (`-f`)
    #[builder(into)]
    pub format: Option<String>,
    /// Where downloaded media is written
    pub output_dir: Option<PathBuf>,
}

/// Subset of the yt-dlp info JSON the handlers care about
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVideoInfo {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub thumbnails: Vec<Thumbnail>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    pub creator: Option<String>,
    pub duration: Option<f64>,
    pub description: Option<String>,
    pub view_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    pub url: Option<String>,
}

/// Result of a download call
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// Final file path as reported by the extractor, if any
    pub filepath: Option<PathBuf>,
}

#[async_trait]
pub trait VideoExtractor: Send + Sync {
    /// Fetch metadata without downloading media
    async fn extract_info(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<RawVideoInfo, ExtractError>;

    /// Download media into `options.output_dir`
    async fn download(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<DownloadReport, ExtractError>;
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_info_from_ytdlp_json() {
        let json = r#"{
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg",
            "thumbnails": [
                {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg", "preference": -10},
                {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg", "preference": 0}
            ],
            "uploader": "Rick Astley",
            "channel": "Rick Astley",
            "duration": 212,
            "view_count": 1500000000,
            "description": "The official video",
            "formats": []
        }"#;

        let info: RawVideoInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.title.as_deref(), Some("Never Gonna Give You Up"));
        assert_eq!(info.thumbnails.len(), 2);
        assert_eq!(info.duration, Some(212.0));
        assert_eq!(info.view_count, Some(1_500_000_000));
        assert!(info.creator.is_none());
    }

    #[test]
    fn test_raw_info_tolerates_nulls() {
        let json = r#"{"title": null, "thumbnails": null, "duration": 12.5, "view_count": null}"#;

        let info: RawVideoInfo = serde_json::from_str(json).unwrap();
        assert!(info.title.is_none());
        assert!(info.thumbnails.is_empty());
        assert_eq!(info.duration, Some(12.5));
        assert!(info.view_count.is_none());
    }

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::builder()
            .user_agent("agent/1.0")
            .format("best")
            .build();

        assert_eq!(options.user_agent, "agent/1.0");
        assert_eq!(options.format.as_deref(), Some("best"));
        assert!(!options.no_check_certificate);
        assert!(options.output_dir.is_none());
    }
}
