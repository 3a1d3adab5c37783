use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("storage.bucket must not be empty")]
    EmptyBucket,

    #[error("storage.signed_url_ttl_secs must be greater than zero")]
    ZeroSignedUrlTtl,

    #[error("server.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("extractor.program must not be empty")]
    EmptyExtractorProgram,

    #[error("supabase.url must be an http(s) URL, got '{0}'")]
    InvalidSupabaseUrl(String),
}

/// Validate a loaded configuration.
///
/// Missing credentials are accepted here; handlers that need them answer
/// with a 500 instead.
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    if config.storage.bucket.trim().is_empty() {
        return Err(ValidationError::EmptyBucket);
    }

    if config.storage.signed_url_ttl_secs == 0 {
        return Err(ValidationError::ZeroSignedUrlTtl);
    }

    if config.server.max_body_bytes == 0 {
        return Err(ValidationError::ZeroBodyLimit);
    }

    if config.extractor.program.trim().is_empty() {
        return Err(ValidationError::EmptyExtractorProgram);
    }

    if let Some(url) = config.supabase.url.as_deref().filter(|u| !u.is_empty()) {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidSupabaseUrl(url.to_string()));
        }
    }

    Ok(())
}
