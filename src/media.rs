//! Normalization helpers shared by the metadata and download handlers

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::extractor::RawVideoInfo;

/// Maximum number of characters kept from a video description
pub const DESCRIPTION_MAX_CHARS: usize = 500;

pub const UNKNOWN_UPLOADER: &str = "unknown";
pub const UNTITLED: &str = "Untitled";

/// Source platform, guessed from the video URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Other,
}

impl Platform {
    pub fn classify(url: &str) -> Self {
        if url.contains("youtube") || url.contains("youtu.be") {
            Platform::Youtube
        } else if url.contains("instagram") {
            Platform::Instagram
        } else {
            Platform::Other
        }
    }
}

/// Normalized metadata returned by `POST /get-video-metadata`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub thumbnail: String,
    pub uploader: String,
    pub duration: u64,
    pub duration_string: String,
    pub description: String,
    pub view_count: u64,
    pub video_url: String,
    pub platform: Platform,
}

impl VideoInfo {
    pub fn from_raw(raw: RawVideoInfo, video_url: &str) -> Self {
        // Fractional seconds are dropped
        let duration = raw
            .duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d as u64)
            .unwrap_or(0);

        Self {
            title: raw.title.clone().unwrap_or_else(|| UNTITLED.to_string()),
            thumbnail: select_thumbnail(&raw),
            uploader: resolve_uploader(&raw),
            duration,
            duration_string: format_duration(duration),
            description: truncate_description(raw.description.as_deref().unwrap_or_default()),
            view_count: raw.view_count.unwrap_or(0),
            video_url: video_url.to_string(),
            platform: Platform::classify(video_url),
        }
    }
}

/// Format seconds as `H:MM:SS`, dropping the hour segment when it is zero.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// The last entry of the thumbnail list is the largest one yt-dlp knows about.
pub fn select_thumbnail(raw: &RawVideoInfo) -> String {
    let fallback = raw.thumbnail.clone().unwrap_or_default();

    match raw.thumbnails.last() {
        Some(last) => last.url.clone().unwrap_or(fallback),
        None => fallback,
    }
}

pub fn resolve_uploader(raw: &RawVideoInfo) -> String {
    [&raw.uploader, &raw.channel, &raw.creator]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .cloned()
        .unwrap_or_else(|| UNKNOWN_UPLOADER.to_string())
}

pub fn truncate_description(description: &str) -> String {
    description.chars().take(DESCRIPTION_MAX_CHARS).collect()
}

/// Keep alphanumerics, space, `-`, `_` and `.`, then trim.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Date-partitioned object path: `<prefix>/YYYY/MM/DD/<filename>`
pub fn storage_path(prefix: &str, date: NaiveDate, filename: &str) -> String {
    format!(
        "{}/{:04}/{:02}/{:02}/{}",
        prefix.trim_end_matches('/'),
        date.year(),
        date.month(),
        date.day(),
        filename
    )
}

/// Find the file yt-dlp produced inside `dir`.
///
/// The path reported by the extractor wins when it exists. Otherwise the
/// first regular file in `dir` (by name) is used.
pub async fn locate_downloaded_file(
    dir: &Path,
    reported: Option<&Path>,
) -> std::io::Result<Option<PathBuf>> {
    if let Some(path) = reported {
        if tokio::fs::try_exists(path).await? {
            return Ok(Some(path.to_path_buf()));
        }
        tracing::debug!(reported = %path.display(), "Reported download path missing, scanning directory");
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    Ok(files.into_iter().next())
}
