//! Object storage abstraction for downloaded media
//!
//! Every backend answers with a plain `Result`: an upload either stores the
//! object or returns a [`StorageError`].

mod s3;

pub use s3::ObjectStoreStorage;

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend answered but refused the operation
    #[error("{0}")]
    Rejected(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Metadata returned after upload
#[derive(Debug, Clone)]
pub struct UploadMetadata {
    pub key: String,
    pub size: usize,
}

/// Bucket-scoped object storage with signed read links
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Bucket all paths are relative to
    fn bucket(&self) -> &str;

    /// Store `data` under `path`
    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> Result<UploadMetadata>;

    /// Create a URL granting read access to `path` for `ttl`
    async fn create_signed_url(&self, path: &str, ttl: Duration) -> Result<String>;
}
