use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{SupabaseClient, error_message};
use crate::storage::{ObjectStorage, Result, StorageError, UploadMetadata};

/// Supabase Storage bucket
#[derive(Debug, Clone)]
pub struct SupabaseStorage {
    client: SupabaseClient,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct SignedUrlBody {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

impl SupabaseStorage {
    pub fn new(client: SupabaseClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn object_segments<'a>(&'a self, action: &'a str, path: &'a str) -> Vec<&'a str> {
        let mut segments = vec!["storage", "v1", "object"];
        if !action.is_empty() {
            segments.push(action);
        }
        segments.push(&self.bucket);
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        segments
    }

    /// Supabase answers with a link relative to `<base>/storage/v1`
    fn absolute_signed_url(&self, relative: &str) -> String {
        if relative.starts_with("http://") || relative.starts_with("https://") {
            return relative.to_string();
        }
        let base = self.client.base_url().as_str().trim_end_matches('/');
        let relative = relative.trim_start_matches('/');
        format!("{base}/storage/v1/{relative}")
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> Result<UploadMetadata> {
        let url = self.client.endpoint(self.object_segments("", path));
        let size = data.len();

        let response = self
            .client
            .authorize(self.client.http().post(url))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = error_message(response).await;
            tracing::warn!(bucket = %self.bucket, key = path, %status, error = %message, "Supabase upload rejected");
            return Err(StorageError::Rejected(message));
        }

        tracing::info!(bucket = %self.bucket, key = path, size, "Uploaded to Supabase Storage");

        Ok(UploadMetadata {
            key: path.to_string(),
            size,
        })
    }

    async fn create_signed_url(&self, path: &str, ttl: Duration) -> Result<String> {
        let url = self.client.endpoint(self.object_segments("sign", path));

        let response = self
            .client
            .authorize(self.client.http().post(url))
            .json(&json!({ "expiresIn": ttl.as_secs() }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Rejected(error_message(response).await));
        }

        let body: SignedUrlBody = response.json().await?;
        Ok(self.absolute_signed_url(&body.signed_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SupabaseStorage {
        let client =
            SupabaseClient::new("https://abc.supabase.co", "service-key", Duration::from_secs(5))
                .unwrap();
        SupabaseStorage::new(client, "media_uploads")
    }

    #[test]
    fn test_upload_url() {
        let storage = storage();
        let url = storage
            .client
            .endpoint(storage.object_segments("", "video-downloads/2024/05/01/My Clip.mp4"));
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/storage/v1/object/media_uploads/video-downloads/2024/05/01/My%20Clip.mp4"
        );
    }

    #[test]
    fn test_sign_url() {
        let storage = storage();
        let url = storage
            .client
            .endpoint(storage.object_segments("sign", "video-downloads/clip.mp4"));
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/storage/v1/object/sign/media_uploads/video-downloads/clip.mp4"
        );
    }

    #[test]
    fn test_absolute_signed_url() {
        let storage = storage();
        assert_eq!(
            storage.absolute_signed_url("/object/sign/media_uploads/clip.mp4?token=abc"),
            "https://abc.supabase.co/storage/v1/object/sign/media_uploads/clip.mp4?token=abc"
        );
        assert_eq!(
            storage.absolute_signed_url("https://cdn.example.com/clip.mp4?token=abc"),
            "https://cdn.example.com/clip.mp4?token=abc"
        );
    }

    #[test]
    fn test_signed_url_body_accepts_both_casings() {
        let body: SignedUrlBody =
            serde_json::from_str(r#"{"signedURL": "/object/sign/a?token=1"}"#).unwrap();
        assert_eq!(body.signed_url, "/object/sign/a?token=1");

        let body: SignedUrlBody =
            serde_json::from_str(r#"{"signedUrl": "/object/sign/b?token=2"}"#).unwrap();
        assert_eq!(body.signed_url, "/object/sign/b?token=2");
    }
}
