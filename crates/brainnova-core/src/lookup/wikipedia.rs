//! ============================================================================
//! Wikipedia Lookup - REST summary endpoint client
//! ============================================================================
//! GET {base_url}/{percent-encoded query} and read `title` + `extract`.
//! HTTP 404 is "not found"; any other failure is a transport error.
//! ============================================================================

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{FactLookup, LookupError, LookupHit};

/// Wikipedia REST summary endpoint
pub const DEFAULT_SUMMARY_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

const SOURCE_NAME: &str = "Wikipedia";

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    title: Option<String>,
    extract: Option<String>,
}

/// Lookup client for the Wikipedia summary API
pub struct WikipediaLookup {
    client: Client,
    base_url: String,
}

impl WikipediaLookup {
    /// Create a client against `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("brainnova/1.0")
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Client against the public Wikipedia endpoint
    pub fn public(timeout: Duration) -> Result<Self> {
        Self::new(DEFAULT_SUMMARY_URL, timeout)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for a query
    pub fn summary_url(&self, query: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(query))
    }
}

#[async_trait]
impl FactLookup for WikipediaLookup {
    async fn lookup(&self, query: &str) -> Result<LookupHit, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::NotFound);
        }

        let url = self.summary_url(query);
        debug!("Looking up {:?} at {}", query, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("No summary for {:?}", query);
            return Err(LookupError::NotFound);
        }
        if !status.is_success() {
            warn!("Summary lookup failed for {:?}: {}", query, status);
            return Err(LookupError::Transport(format!("HTTP {}", status)));
        }

        let body: SummaryResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Transport(format!("Failed to parse summary: {}", e)))?;

        let extract = body
            .extract
            .filter(|e| !e.trim().is_empty())
            .ok_or(LookupError::MissingExtract)?;
        let title = body
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| query.to_string());

        Ok(LookupHit { title, extract })
    }

    fn source_name(&self) -> &str {
        SOURCE_NAME
    }
}
