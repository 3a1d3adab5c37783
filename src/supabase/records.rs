use async_trait::async_trait;
use serde_json::Value;

use super::{SupabaseClient, error_message};
use crate::records::{RecordError, RecordLookup};

#[async_trait]
impl RecordLookup for SupabaseClient {
    async fn get_by_id(&self, table: &str, id: &str) -> Result<Option<Value>, RecordError> {
        let url = self.endpoint(["rest", "v1", table]);
        let filter = format!("eq.{id}");

        let response = self
            .authorize(self.http().get(url))
            .query(&[("select", "*"), ("id", filter.as_str()), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RecordError::Rejected(error_message(response).await));
        }

        let rows: Vec<Value> = response.json().await?;
        tracing::debug!(table, id, found = !rows.is_empty(), "Record lookup");

        Ok(rows.into_iter().next())
    }
}
