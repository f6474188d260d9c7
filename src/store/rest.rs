//! Hosted record store spoken to over the Supabase PostgREST API
//!
//! Requests go to `{project_url}/rest/v1/{table}` and carry the project's
//! anon key both as `apikey` and as a bearer token. No timeout is configured
//! on the client, so a hung request stays pending.

use log::{debug, error};
use reqwest::{Client, RequestBuilder, Response};

use super::{Filter, RecordStore};
use crate::error::{InventoryError, Result};
use crate::models::{InventoryItem, NewInventoryItem, QuantityPatch};

/// PostgREST client for a single Supabase project
pub struct SupabaseStore {
    pub(crate) client: Client,
    pub(crate) rest_url: String,
    api_key: String,
}

impl SupabaseStore {
    /// Create a client for the project at `project_url` (e.g. `https://xyz.supabase.co`)
    pub fn new(project_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(InventoryError::Config(
                "Supabase anon key must not be empty".to_string(),
            ));
        }

        let rest_url = normalize_rest_url(project_url)?;
        log::info!("Creating Supabase record store for {}", rest_url);
        debug!("API key length: {}", api_key.len());

        Ok(Self {
            client: Client::new(),
            rest_url,
            api_key,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }
}

/// Accepts either the bare project URL or one already ending in `/rest/v1`
fn normalize_rest_url(project_url: &str) -> Result<String> {
    let trimmed = project_url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(InventoryError::Config(format!(
            "Supabase URL must be http(s): {:?}",
            project_url
        )));
    }

    if trimmed.ends_with("/rest/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}/rest/v1", trimmed))
    }
}

/// Turn non-2xx answers into [`InventoryError::HttpStatus`] with the body text attached
async fn ensure_success(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!("{} failed with status {}: {}", action, status, body);
    Err(InventoryError::HttpStatus { status, body })
}

impl RecordStore for SupabaseStore {
    async fn select(&self, table: &str, filter: Option<&Filter>) -> Result<Vec<InventoryItem>> {
        let url = self.table_url(table);
        debug!("Selecting from {} (filter: {:?})", url, filter);

        let mut request = self
            .authorized(self.client.get(&url))
            .query(&[("select", "*"), ("order", "id.asc")]);

        if let Some(filter) = filter {
            request = request.query(&[(filter.column.as_str(), format!("eq.{}", filter.value))]);
            if let Some(limit) = filter.limit {
                request = request.query(&[("limit", limit)]);
            }
        }

        let response = ensure_success(request.send().await?, "Select").await?;
        let body = response.text().await?;
        debug!("Select response body: {}", body);

        Ok(serde_json::from_str(&body)?)
    }

    async fn insert(&self, table: &str, row: &NewInventoryItem) -> Result<()> {
        let url = self.table_url(table);
        debug!("Inserting into {}: {:?}", url, row);

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        ensure_success(response, "Insert").await?;
        Ok(())
    }

    async fn update(&self, table: &str, id: i64, patch: &QuantityPatch) -> Result<()> {
        let url = self.table_url(table);
        debug!("Updating {} id={} with {:?}", url, id, patch);

        let response = self
            .authorized(self.client.patch(&url))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;

        ensure_success(response, "Update").await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "rest_tests.rs"]
mod tests;
