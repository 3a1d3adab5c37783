use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl Config {
    /// Supabase base URL and service key, when both are present
    pub fn supabase_credentials(&self) -> Option<(&str, &str)> {
        let url = self.supabase.url.as_deref().filter(|v| !v.is_empty())?;
        let key = self
            .supabase
            .service_role_key
            .as_deref()
            .filter(|v| !v.is_empty())?;
        Some((url, key))
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Upper bound for JSON request bodies
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

/// Supabase project settings, shared by record lookup and Supabase storage
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub url: Option<String>,
    /// Service role key (loaded from environment, not from config file)
    #[serde(skip)]
    pub service_role_key: Option<String>,
    #[serde(default = "default_media_table")]
    pub media_table: String,
    #[serde(default = "default_video_url_column")]
    pub video_url_column: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_role_key: None,
            media_table: default_media_table(),
            video_url_column: default_video_url_column(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_media_table() -> String {
    "media_library".to_string()
}

fn default_video_url_column() -> String {
    "video_url".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Storage provider type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    #[default]
    Supabase,
    S3,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: StorageProvider,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// First segment of every stored object path
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
    #[serde(default = "default_signed_url_ttl_secs")]
    pub signed_url_ttl_secs: u64,
    /// S3 endpoint override (MinIO, R2, ...)
    pub endpoint: Option<String>,
    pub region: Option<String>,
    /// S3 access key (loaded from environment, not from config file)
    #[serde(skip)]
    pub access_key: Option<String>,
    /// S3 secret key (loaded from environment, not from config file)
    #[serde(skip)]
    pub secret_key: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            bucket: default_bucket(),
            path_prefix: default_path_prefix(),
            signed_url_ttl_secs: default_signed_url_ttl_secs(),
            endpoint: None,
            region: None,
            access_key: None,
            secret_key: None,
        }
    }
}

fn default_bucket() -> String {
    "media_uploads".to_string()
}

fn default_path_prefix() -> String {
    "video-downloads".to_string()
}

fn default_signed_url_ttl_secs() -> u64 {
    3600
}

/// yt-dlp invocation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractorConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_no_check_certificate")]
    pub no_check_certificate: bool,
    /// Format selector used by the download handler
    #[serde(default = "default_download_format")]
    pub download_format: String,
    /// Parent directory for per-request scratch dirs (system temp dir when unset)
    pub temp_root: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            user_agent: default_user_agent(),
            no_check_certificate: default_no_check_certificate(),
            download_format: default_download_format(),
            temp_root: None,
        }
    }
}

fn default_program() -> String {
    "yt-dlp".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_no_check_certificate() -> bool {
    true
}

fn default_download_format() -> String {
    "best[ext=mp4]/best[height<=720]/best".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.storage.provider, StorageProvider::Supabase);
        assert_eq!(config.storage.bucket, "media_uploads");
        assert_eq!(config.storage.path_prefix, "video-downloads");
        assert_eq!(config.storage.signed_url_ttl_secs, 3600);
        assert_eq!(config.supabase.media_table, "media_library");
        assert_eq!(
            config.extractor.download_format,
            "best[ext=mp4]/best[height<=720]/best"
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[server]
bind_addr = "127.0.0.1:9000"

[storage]
provider = "s3"
bucket = "clips"
region = "eu-west-1"

[extractor]
temp_root = "/var/tmp/vidgrab"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_addr.port(), 9000);
        assert_eq!(config.server.max_body_bytes, 64 * 1024);
        assert_eq!(config.storage.provider, StorageProvider::S3);
        assert_eq!(config.storage.bucket, "clips");
        assert_eq!(config.storage.path_prefix, "video-downloads");
        assert!(config.storage.access_key.is_none());
        assert_eq!(config.extractor.program, "yt-dlp");
        assert_eq!(
            config.extractor.temp_root,
            Some(PathBuf::from("/var/tmp/vidgrab"))
        );
        assert!(config.supabase.url.is_none());
    }

    #[test]
    fn test_supabase_credentials_require_both_values() {
        let mut config = Config::default();
        assert!(config.supabase_credentials().is_none());

        config.supabase.url = Some("https://abc.supabase.co".to_string());
        assert!(config.supabase_credentials().is_none());

        config.supabase.service_role_key = Some(String::new());
        assert!(config.supabase_credentials().is_none());

        config.supabase.service_role_key = Some("service-key".to_string());
        assert_eq!(
            config.supabase_credentials(),
            Some(("https://abc.supabase.co", "service-key"))
        );
    }
}
