//! Liveness and inventory probes against a single Ollama server.
//!
//! The production [`HttpProbe`] issues `GET /api/tags` with a short timeout
//! for liveness and a slightly longer one for inventory. The [`Probe`] trait
//! is the seam tests use to substitute stub behavior.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::registry::Target;

/// Timeout for liveness checks. Polling should give up quickly.
pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(2);
/// Timeout for inventory queries.
pub const INVENTORY_TIMEOUT: Duration = Duration::from_secs(5);

const TAGS_PATH: &str = "/api/tags";

/// Why a probe failed. Callers that only need the original fail-soft
/// behavior can ignore the distinction; it exists so they do not have to.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("server unreachable: {0}")]
    Unreachable(String),
    #[error("probe timed out")]
    Timeout,
    #[error("unexpected status {0}")]
    BadStatus(u16),
    #[error("malformed response body")]
    BadResponse,
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout
        } else if err.is_decode() {
            ProbeError::BadResponse
        } else {
            ProbeError::Unreachable(err.to_string())
        }
    }
}

/// Probe operations the registry fans out per role.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Succeeds iff the server answers the tags endpoint with HTTP 200.
    async fn liveness(&self, target: &Target) -> Result<(), ProbeError>;

    /// The model names the server reports, in the server's order.
    async fn inventory(&self, target: &Target) -> Result<Vec<String>, ProbeError>;
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

/// [`Probe`] implementation that talks to a real server over HTTP.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn liveness(&self, target: &Target) -> Result<(), ProbeError> {
        let url = format!("{}{}", target.base_url(), TAGS_PATH);
        let resp = self
            .client
            .get(url)
            .timeout(LIVENESS_TIMEOUT)
            .send()
            .await?;
        // Liveness means exactly 200, not any 2xx.
        if resp.status() == reqwest::StatusCode::OK {
            Ok(())
        } else {
            Err(ProbeError::BadStatus(resp.status().as_u16()))
        }
    }

    async fn inventory(&self, target: &Target) -> Result<Vec<String>, ProbeError> {
        let url = format!("{}{}", target.base_url(), TAGS_PATH);
        let resp = self
            .client
            .get(url)
            .timeout(INVENTORY_TIMEOUT)
            .send()
            .await?;
        if resp.status() != reqwest::StatusCode::OK {
            return Err(ProbeError::BadStatus(resp.status().as_u16()));
        }
        let tags: TagsResponse = resp.json().await.map_err(|_| ProbeError::BadResponse)?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}
