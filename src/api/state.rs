use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, StorageProvider};
use crate::extractor::{VideoExtractor, YtDlp};
use crate::records::RecordLookup;
use crate::storage::{ObjectStorage, ObjectStoreStorage, StorageError};
use crate::supabase::{SupabaseClient, SupabaseError, SupabaseStorage};

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Supabase client: {0}")]
    Supabase(#[from] SupabaseError),

    #[error("S3 storage: {0}")]
    Storage(#[from] StorageError),
}

/// Shared, immutable handler dependencies.
///
/// `storage` and `records` are `None` when their credentials are not
/// configured; handlers that need them fail with a 500.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub extractor: Arc<dyn VideoExtractor>,
    pub storage: Option<Arc<dyn ObjectStorage>>,
    pub records: Option<Arc<dyn RecordLookup>>,
}

impl AppState {
    pub fn new(
        config: Config,
        extractor: Arc<dyn VideoExtractor>,
        storage: Option<Arc<dyn ObjectStorage>>,
        records: Option<Arc<dyn RecordLookup>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            extractor,
            storage,
            records,
        }
    }

    /// Wire the production collaborators described by `config`
    pub fn from_config(config: Config) -> Result<Self, StateError> {
        let extractor: Arc<dyn VideoExtractor> = Arc::new(YtDlp::new(&config.extractor.program));

        let supabase = match config.supabase_credentials() {
            Some((url, key)) => Some(SupabaseClient::new(
                url,
                key,
                Duration::from_secs(config.supabase.connect_timeout_secs),
            )?),
            None => {
                warn!("SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY not set, media_id lookup disabled");
                None
            }
        };

        let storage: Option<Arc<dyn ObjectStorage>> = match config.storage.provider {
            StorageProvider::Supabase => supabase.clone().map(|client| {
                Arc::new(SupabaseStorage::new(client, config.storage.bucket.clone()))
                    as Arc<dyn ObjectStorage>
            }),
            StorageProvider::S3 => {
                match (&config.storage.access_key, &config.storage.secret_key) {
                    (Some(access), Some(secret)) => Some(Arc::new(ObjectStoreStorage::s3(
                        &config.storage,
                        access,
                        secret,
                    )?) as Arc<dyn ObjectStorage>),
                    _ => None,
                }
            }
        };

        match &storage {
            Some(storage) => info!(
                provider = ?config.storage.provider,
                bucket = storage.bucket(),
                "Object storage configured"
            ),
            None => warn!(
                provider = ?config.storage.provider,
                "Storage credentials missing, downloads will fail"
            ),
        }

        let records = supabase.map(|client| Arc::new(client) as Arc<dyn RecordLookup>);

        Ok(Self::new(config, extractor, storage, records))
    }
}
