use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
};
use bytes::Bytes;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::{
    error::{
        ApiError, DOWNLOAD_UNHANDLED, METADATA_UNHANDLED, download_failure_message,
        metadata_failure_message,
    },
    models::{DownloadRequest, DownloadResponse, HealthResponse, MediaId, MetadataRequest},
    state::AppState,
    utils::{ensure_post, non_blank, parse_json_body, read_body},
};
use crate::extractor::{ExtractError, ExtractOptions};
use crate::media::{self, VideoInfo};
use crate::records;

pub const VIDEO_URL_REQUIRED: &str = "video URL is required";
pub const VIDEO_SOURCE_REQUIRED: &str = "video URL or media identifier is required";
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Video metadata endpoint (POST /get-video-metadata)
///
/// Asks the extractor for info without downloading anything and returns a
/// normalized [`VideoInfo`].
pub async fn get_video_metadata(
    State(state): State<AppState>,
    method: Method,
    body: axum::body::Body,
) -> Result<Json<VideoInfo>, ApiError> {
    ensure_post(&method)?;

    let data = read_body(body, state.config.server.max_body_bytes).await?;
    let request: MetadataRequest = parse_json_body(&data)?;

    let video_url = non_blank(request.video_url)
        .ok_or_else(|| ApiError::BadRequest(VIDEO_URL_REQUIRED.to_string()))?;

    let span = info_span!("get_video_metadata", request_id = %Uuid::now_v7(), %video_url);
    fetch_metadata(&state, video_url).instrument(span).await.map(Json)
}

async fn fetch_metadata(state: &AppState, video_url: String) -> Result<VideoInfo, ApiError> {
    let extractor = &state.config.extractor;
    let options = ExtractOptions::builder()
        .user_agent(&extractor.user_agent)
        .no_check_certificate(extractor.no_check_certificate)
        .build();

    let raw = state
        .extractor
        .extract_info(&video_url, &options)
        .await
        .map_err(|err| match err {
            ExtractError::Failed(message) => {
                warn!(error = %message, "Extractor could not read video metadata");
                ApiError::ExtractionFailure(metadata_failure_message(&message))
            }
            other => ApiError::unhandled(METADATA_UNHANDLED, other),
        })?;

    let info = VideoInfo::from_raw(raw, &video_url);
    info!(platform = ?info.platform, duration = info.duration, "Metadata extracted");

    Ok(info)
}

/// Video download endpoint (POST /download-video)
///
/// ## Flow:
/// 1. Resolve the source URL (directly, or through the media library)
/// 2. Download into a scratch directory owned by this request
/// 3. Upload the file under `<prefix>/YYYY/MM/DD/<filename>`
/// 4. Return a signed link valid for `storage.signed_url_ttl_secs`
///
/// The scratch directory is removed when the request finishes, whatever
/// the outcome.
pub async fn download_video(
    State(state): State<AppState>,
    method: Method,
    body: axum::body::Body,
) -> Result<Json<DownloadResponse>, ApiError> {
    ensure_post(&method)?;

    let data = read_body(body, state.config.server.max_body_bytes).await?;
    let request: DownloadRequest = parse_json_body(&data)?;

    let span = info_span!("download_video", request_id = %Uuid::now_v7());
    process_download(&state, request).instrument(span).await.map(Json)
}

async fn process_download(
    state: &AppState,
    request: DownloadRequest,
) -> Result<DownloadResponse, ApiError> {
    let video_url = non_blank(request.video_url);
    let media_id = request.media_id.filter(|id| !id.is_blank());

    if video_url.is_none() && media_id.is_none() {
        return Err(ApiError::BadRequest(VIDEO_SOURCE_REQUIRED.to_string()));
    }

    // Checked before any network work, including the media_id lookup
    let storage = state
        .storage
        .clone()
        .ok_or_else(|| ApiError::Internal("storage configuration not found".to_string()))?;

    let video_url = match (video_url, media_id) {
        (Some(url), _) => Some(url),
        (None, Some(id)) => resolve_media_url(state, &id).await?,
        (None, None) => None,
    }
    .ok_or_else(|| ApiError::BadRequest(VIDEO_SOURCE_REQUIRED.to_string()))?;
    info!(%video_url, "Starting download");

    let scratch = scratch_dir(state).map_err(|e| ApiError::unhandled(DOWNLOAD_UNHANDLED, e))?;

    let extractor = &state.config.extractor;
    let options = ExtractOptions::builder()
        .user_agent(&extractor.user_agent)
        .no_check_certificate(extractor.no_check_certificate)
        .format(&extractor.download_format)
        .output_dir(scratch.path().to_path_buf())
        .build();

    let report = state
        .extractor
        .download(&video_url, &options)
        .await
        .map_err(|err| match err {
            ExtractError::Failed(message) => {
                warn!(error = %message, "Extractor could not download video");
                ApiError::ExtractionFailure(download_failure_message(&message))
            }
            other => ApiError::unhandled(DOWNLOAD_UNHANDLED, other),
        })?;

    let file = media::locate_downloaded_file(scratch.path(), report.filepath.as_deref())
        .await
        .map_err(|e| ApiError::unhandled(DOWNLOAD_UNHANDLED, e))?
        .ok_or(ApiError::DownloadFailed)?;

    let bytes = tokio::fs::read(&file)
        .await
        .map_err(|e| ApiError::unhandled(DOWNLOAD_UNHANDLED, e))?;
    let size = bytes.len();

    let original_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let filename = match media::sanitize_filename(&original_name) {
        name if name.is_empty() => "video.mp4".to_string(),
        name => name,
    };

    let storage_config = &state.config.storage;
    let path = media::storage_path(
        &storage_config.path_prefix,
        chrono::Utc::now().date_naive(),
        &filename,
    );

    let uploaded = storage
        .upload(&path, Bytes::from(bytes), VIDEO_CONTENT_TYPE)
        .await
        .map_err(|e| ApiError::Internal(format!("error uploading video: {e}")))?;

    let download_url = storage
        .create_signed_url(&path, Duration::from_secs(storage_config.signed_url_ttl_secs))
        .await
        .map_err(|e| {
            warn!(error = %e, %path, "Signed URL request failed");
            ApiError::Internal("could not create signed URL".to_string())
        })?;

    info!(
        bucket = storage.bucket(),
        key = %uploaded.key,
        size = uploaded.size,
        "Video stored"
    );

    Ok(DownloadResponse {
        download_url,
        filename,
        size,
    })
}

/// Look up the stored URL for `id` in the media library table
async fn resolve_media_url(state: &AppState, id: &MediaId) -> Result<Option<String>, ApiError> {
    let lookup = state
        .records
        .as_ref()
        .ok_or_else(|| ApiError::Internal("record store configuration not found".to_string()))?;

    let supabase = &state.config.supabase;
    let record = lookup
        .get_by_id(&supabase.media_table, &id.to_string())
        .await
        .map_err(|e| ApiError::unhandled(DOWNLOAD_UNHANDLED, e))?;

    let url = record.and_then(|r| records::string_field(&r, &supabase.video_url_column));
    if url.is_none() {
        warn!(media_id = %id, table = %supabase.media_table, "No video URL stored for media id");
    }

    Ok(url)
}

fn scratch_dir(state: &AppState) -> std::io::Result<tempfile::TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("vidgrab-");

    match &state.config.extractor.temp_root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
}

/// Health check endpoint (GET /health)
///
/// Reports which collaborators are configured. Returns 503 when object
/// storage is missing, since downloads cannot succeed without it.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let configured = |present: bool| match present {
        true => "configured".to_string(),
        false => "missing".to_string(),
    };

    let mut components = std::collections::BTreeMap::new();
    components.insert("api".to_string(), "healthy".to_string());
    components.insert("extractor".to_string(), state.config.extractor.program.clone());
    components.insert("storage".to_string(), configured(state.storage.is_some()));
    components.insert("records".to_string(), configured(state.records.is_some()));

    let (status_code, status) = if state.storage.is_some() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let response = HealthResponse {
        status: status.to_string(),
        components,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status_code, Json(response))
}
