/// Person-search proxy — forwards lookups to the third-party search API.
///
/// Result data is opaque: only the top-level `status` and `data` keys are read,
/// and `data` is passed through untouched.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod handlers;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    status: Option<String>,
    #[serde(default)]
    data: Value,
}

/// `{ status, data }` as returned to the browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub status: String,
    pub data: Value,
}

impl From<UpstreamResponse> for SearchResponse {
    fn from(upstream: UpstreamResponse) -> Self {
        Self {
            status: upstream.status.unwrap_or_else(|| "success".to_string()),
            data: upstream.data,
        }
    }
}

#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    base_url: String,
    token: String,
}

impl SearchClient {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            token,
        }
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query)])
            .bearer_auth(&self.token)
            .header("content-type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let upstream: UpstreamResponse = response.json().await?;
        debug!("Search for {query} returned status {:?}", upstream.status);
        Ok(upstream.into())
    }
}
