//! HTTP client wrapper for info service requests.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::InfoError;

/// Default timeout for info service requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default public cloud info service base URL.
pub const DEFAULT_BASE_URL: &str = "https://susepubliccloudinfo.suse.com";

/// HTTP client wrapper for info service requests.
#[derive(Debug, Clone)]
pub struct InfoClient {
    inner: Client,
    base_url: String,
}

impl InfoClient {
    /// Create a new client with the specified timeout and base URL.
    pub fn new(timeout: Duration, base_url: &str) -> Result<Self, InfoError> {
        let inner = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new client with the default timeout and base URL.
    pub fn with_default_timeout() -> Result<Self, InfoError> {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_BASE_URL)
    }

    /// Create a new client with a custom base URL (for testing).
    pub fn with_base_url(base_url: &str) -> Result<Self, InfoError> {
        Self::new(DEFAULT_TIMEOUT, base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `url` and return the body as text.
    ///
    /// # Errors
    ///
    /// Returns `InfoError::Http` for a non-success status and
    /// `InfoError::EmptyResponse` if the body is empty.
    pub async fn get_text(&self, url: &str) -> Result<String, InfoError> {
        debug!(url, "requesting");
        let response = self.inner.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InfoError::Http(status.as_u16()));
        }

        let text = response.text().await?;
        if text.is_empty() {
            return Err(InfoError::EmptyResponse);
        }
        debug!(url, bytes = text.len(), "received");
        Ok(text)
    }
}
