//! S3-compatible storage through the `object_store` crate

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::signer::Signer;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, PutOptions, PutPayload,
    path::Path as StoragePath,
};
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;

use super::{ObjectStorage, Result, UploadMetadata};
use crate::config::StorageConfig;

/// Storage client wrapping any signing-capable object_store backend
#[derive(Clone)]
pub struct ObjectStoreStorage<S> {
    store: Arc<S>,
    bucket: String,
}

impl<S> ObjectStoreStorage<S>
where
    S: ObjectStore + Signer,
{
    pub fn new(store: Arc<S>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }
}

impl ObjectStoreStorage<AmazonS3> {
    /// Build an S3 client from config and explicit credentials
    pub fn s3(config: &StorageConfig, access_key: &str, secret_key: &str) -> Result<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_access_key_id(access_key)
            .with_secret_access_key(secret_key);

        if let Some(region) = &config.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &config.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        Ok(Self::new(Arc::new(builder.build()?), config.bucket.clone()))
    }
}

#[async_trait]
impl<S> ObjectStorage for ObjectStoreStorage<S>
where
    S: ObjectStore + Signer,
{
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> Result<UploadMetadata> {
        let location = StoragePath::from(path);
        let size = data.len();

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&location, PutPayload::from(data), options)
            .await?;

        tracing::info!(bucket = %self.bucket, key = path, size, "Uploaded to object store");

        Ok(UploadMetadata {
            key: path.to_string(),
            size,
        })
    }

    async fn create_signed_url(&self, path: &str, ttl: Duration) -> Result<String> {
        let location = StoragePath::from(path);
        let url = self.store.signed_url(Method::GET, &location, ttl).await?;
        Ok(url.to_string())
    }
}
