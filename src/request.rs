//! Query parameters and request URL construction.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// API version segment of every request URL.
pub const API_VERSION: &str = "v1";

/// Region value that selects every region.
pub const ALL_REGIONS: &str = "all";

/// Kind of descriptor list being queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoType {
    Images,
    Servers,
}

impl InfoType {
    /// URL segment and payload key, e.g. `images`.
    pub fn as_str(self) -> &'static str {
        match self {
            InfoType::Images => "images",
            InfoType::Servers => "servers",
        }
    }

    /// Element name of a single record in XML output, e.g. `image`.
    pub fn singular(self) -> &'static str {
        match self {
            InfoType::Images => "image",
            InfoType::Servers => "server",
        }
    }
}

impl fmt::Display for InfoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested result format.
///
/// Names are matched exactly (`json`, not `JSON`). Formats outside this set
/// are rejected rather than forwarded to the server as a URL suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Whatever the server answers for `xml`.
    #[default]
    Plain,
    Json,
    Xml,
}

impl OutputFormat {
    /// Format suffix requested from the server.
    ///
    /// Filtering happens on decoded JSON, so a filtered request always asks
    /// for `json` regardless of the desired output.
    pub fn server_suffix(self, filtering: bool) -> &'static str {
        match self {
            _ if filtering => "json",
            OutputFormat::Json => "json",
            OutputFormat::Plain | OutputFormat::Xml => "xml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            _ => Err(format!(
                "unknown format: {} (expected plain, json, or xml)",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Xml => write!(f, "xml"),
        }
    }
}

/// Parameters of an image or server query.
///
/// ```
/// use public_cloud_info::{InfoType, OutputFormat, Query};
///
/// let query = Query::new("amazon")
///     .with_region("eu-central-1")
///     .with_selector("active")
///     .with_format(OutputFormat::Json);
/// assert_eq!(
///     query.url("https://example.com", InfoType::Images),
///     "https://example.com/v1/amazon/eu-central-1/images/active.json"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    framework: String,
    selector: Option<String>,
    format: OutputFormat,
    region: String,
    filter: Option<String>,
}

impl Query {
    /// Query every region of `framework` in plain format without filtering.
    pub fn new(framework: impl Into<String>) -> Self {
        Self {
            framework: framework.into(),
            selector: None,
            format: OutputFormat::default(),
            region: ALL_REGIONS.to_string(),
            filter: None,
        }
    }

    /// Narrow by image state (`active`, `deprecated`, ...) or server type
    /// (`smt`, `regionserver`, ...).
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Restrict to one region; `all` or an empty string means every region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Filter expression applied client-side, e.g. `name~sles,publishedon>20200101`.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn framework(&self) -> &str {
        &self.framework
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// The filter expression, if one was given and is not empty.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref().filter(|f| !f.is_empty())
    }

    /// Build the request URL for `info_type` below `base_url`.
    pub fn url(&self, base_url: &str, info_type: InfoType) -> String {
        let mut segments: Vec<Cow<'_, str>> = vec![
            Cow::Borrowed(base_url),
            Cow::Borrowed(API_VERSION),
            Cow::Borrowed(self.framework.as_str()),
        ];
        if !self.region.is_empty() && self.region != ALL_REGIONS {
            segments.push(urlencoding::encode(&self.region));
        }
        segments.push(Cow::Borrowed(info_type.as_str()));
        if let Some(selector) = self.selector.as_deref().filter(|s| !s.is_empty()) {
            segments.push(urlencoding::encode(selector));
        }
        let suffix = self.format.server_suffix(self.filter().is_some());
        format!("{}.{}", segments.join("/"), suffix)
    }
}

/// URL of a listing below the API root, e.g. `<base>/v1/amazon/regions.json`.
pub(crate) fn listing_url(base_url: &str, path: &[&str], format: OutputFormat) -> String {
    let mut segments = vec![base_url, API_VERSION];
    segments.extend_from_slice(path);
    format!("{}.{}", segments.join("/"), format.server_suffix(false))
}
