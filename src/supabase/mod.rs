//! Supabase REST client
//!
//! One authenticated `reqwest` client serves both collaborators the
//! download handler needs:
//! - [`SupabaseStorage`] implements [`ObjectStorage`](crate::storage::ObjectStorage)
//!   on top of Supabase Storage
//! - [`SupabaseClient`] implements [`RecordLookup`](crate::records::RecordLookup)
//!   on top of PostgREST

mod records;
mod storage;

pub use storage::SupabaseStorage;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("invalid Supabase URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Authenticated handle on a Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: Url,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(
        base_url: &str,
        service_key: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, SupabaseError> {
        let base_url = Url::parse(base_url).map_err(|e| SupabaseError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SupabaseError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("vidgrab/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            service_key: service_key.into(),
        })
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    pub(crate) fn endpoint<'a, I>(&self, segments: I) -> Url
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        // cannot_be_a_base URLs are rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    msg: Option<String>,
}

/// Turn a non-success response into the message Supabase put in its body.
pub(crate) async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();

    parsed
        .message
        .or(parsed.msg)
        .or(parsed.error)
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        })
}
