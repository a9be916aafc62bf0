//! PublicCloudInfo struct and request orchestration.

use tracing::debug;

use crate::client::InfoClient;
use crate::codec;
use crate::error::InfoError;
use crate::filter::FilterChain;
use crate::request::{listing_url, InfoType, OutputFormat, Query};

/// Main interface for querying the public cloud info service.
///
/// # Example
///
/// ```ignore
/// use public_cloud_info::{InfoError, OutputFormat, PublicCloudInfo, Query};
///
/// #[tokio::main]
/// async fn main() -> Result<(), InfoError> {
///     let info = PublicCloudInfo::new()?;
///     let query = Query::new("amazon")
///         .with_selector("active")
///         .with_region("eu-central-1")
///         .with_format(OutputFormat::Json)
///         .with_filter("name~sles,publishedon>20230101");
///     println!("{}", info.images(&query).await?);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PublicCloudInfo {
    client: InfoClient,
}

impl PublicCloudInfo {
    /// Query the public SUSE info service.
    pub fn new() -> Result<Self, InfoError> {
        Ok(Self::with_client(InfoClient::with_default_timeout()?))
    }

    /// Query an info service at a custom base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, InfoError> {
        Ok(Self::with_client(InfoClient::with_base_url(base_url)?))
    }

    pub fn with_client(client: InfoClient) -> Self {
        Self { client }
    }

    /// Fetch image descriptors.
    ///
    /// Without a filter the server's text is returned verbatim. With one,
    /// the JSON list is decoded, filtered and re-encoded in the query's
    /// format (JSON for `json`, XML otherwise).
    ///
    /// # Errors
    ///
    /// Returns `InfoError::EmptyResponse` on an empty body. Decoding and
    /// filter evaluation errors abort the query; invalid filter phrases
    /// are only logged.
    pub async fn images(&self, query: &Query) -> Result<String, InfoError> {
        self.process(query, InfoType::Images).await
    }

    /// Fetch server descriptors; see [`PublicCloudInfo::images`].
    pub async fn servers(&self, query: &Query) -> Result<String, InfoError> {
        self.process(query, InfoType::Servers).await
    }

    /// List the frameworks known to the service.
    pub async fn providers(&self, format: OutputFormat) -> Result<String, InfoError> {
        self.listing(&["providers"], format).await
    }

    /// List the regions of `framework`.
    pub async fn regions(
        &self,
        framework: &str,
        format: OutputFormat,
    ) -> Result<String, InfoError> {
        self.listing(&[framework, "regions"], format).await
    }

    /// List the image states usable as image selectors.
    pub async fn image_states(
        &self,
        framework: &str,
        format: OutputFormat,
    ) -> Result<String, InfoError> {
        self.listing(&[framework, "images", "states"], format).await
    }

    /// List the server types usable as server selectors.
    pub async fn server_types(
        &self,
        framework: &str,
        format: OutputFormat,
    ) -> Result<String, InfoError> {
        self.listing(&[framework, "servers", "types"], format).await
    }

    async fn process(&self, query: &Query, info_type: InfoType) -> Result<String, InfoError> {
        let url = query.url(self.client.base_url(), info_type);
        let text = self.client.get_text(&url).await?;

        let Some(expression) = query.filter() else {
            return Ok(text);
        };

        let chain = FilterChain::parse(expression)?;
        let records = codec::decode(&text, info_type)?;
        let total = records.len();
        let selected = chain.apply(records)?;
        debug!(%info_type, total, selected = selected.len(), "filtered");

        codec::encode(&selected, info_type, query.format())
    }

    async fn listing(&self, path: &[&str], format: OutputFormat) -> Result<String, InfoError> {
        let url = listing_url(self.client.base_url(), path, format);
        self.client.get_text(&url).await
    }
}
