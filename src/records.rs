//! Record lookup collaborator, used to resolve a `media_id` to its stored URL

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record lookup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("record store rejected query: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait RecordLookup: Send + Sync {
    /// Fetch a single row of `table` by primary key
    async fn get_by_id(&self, table: &str, id: &str) -> Result<Option<Value>, RecordError>;
}

/// Read a string column from a record, ignoring blanks
pub fn string_field(record: &Value, column: &str) -> Option<String> {
    record
        .get(column)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_field() {
        let record = json!({"id": 7, "video_url": "https://youtu.be/abc", "blank": "  "});

        assert_eq!(
            string_field(&record, "video_url").as_deref(),
            Some("https://youtu.be/abc")
        );
        assert!(string_field(&record, "blank").is_none());
        assert!(string_field(&record, "id").is_none());
        assert!(string_field(&record, "missing").is_none());
    }
}
