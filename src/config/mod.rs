//! Configuration management for vidgrab
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use vidgrab::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `VIDGRAB__<section>__<key>`
//!
//! Examples:
//! - `VIDGRAB__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `VIDGRAB__STORAGE__BUCKET=media_uploads`
//! - `VIDGRAB__EXTRACTOR__PROGRAM=/opt/yt-dlp`
//!
//! Credentials are only read from plain environment variables:
//! `SUPABASE_URL`, `SUPABASE_SERVICE_ROLE_KEY`, `S3_ACCESS_KEY` / `AWS_ACCESS_KEY_ID`
//! and `S3_SECRET_KEY` / `AWS_SECRET_ACCESS_KEY`.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/vidgrab.toml`.
//! This can be overridden using the `VIDGRAB_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{
    Config, ExtractorConfig, ServerConfig, StorageConfig, StorageProvider, SupabaseConfig,
};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or
    /// validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Same as [`Config::load`], with an explicit file path taking
    /// precedence over `VIDGRAB_CONFIG`.
    pub fn load_with(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path, without secrets
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(
            &config_path,
            r#"
[storage]
bucket = "media_uploads"
            "#,
        )
        .unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.storage.bucket, "media_uploads");
        assert_eq!(config.storage.signed_url_ttl_secs, 3600);
    }

    #[test]
    fn test_validation_catches_zero_ttl() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(
            &config_path,
            r#"
[storage]
signed_url_ttl_secs = 0
            "#,
        )
        .unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::ZeroSignedUrlTtl)
        ));
    }

    #[test]
    fn test_malformed_file_is_load_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[storage\nbucket = ").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(result.unwrap_err(), ConfigError::LoadError(_)));
    }
}
