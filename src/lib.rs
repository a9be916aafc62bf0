//! Client for the public cloud information service with client-side filtering.
//!
//! The service publishes image and server descriptors for public cloud
//! frameworks (`amazon`, `google`, `microsoft`, ...). This crate builds the
//! request URLs, fetches the lists and can narrow them with a compact
//! filter language before re-encoding the result as JSON or XML.
//!
//! # Example
//!
//! ```ignore
//! use public_cloud_info::{InfoError, OutputFormat, PublicCloudInfo, Query};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), InfoError> {
//!     let info = PublicCloudInfo::new()?;
//!
//!     // Raw passthrough of the server's XML
//!     let xml = info.servers(&Query::new("google").with_selector("smt")).await?;
//!
//!     // Filtered and re-encoded as JSON
//!     let query = Query::new("amazon")
//!         .with_region("us-east-1")
//!         .with_format(OutputFormat::Json)
//!         .with_filter("name~sles,publishedon>20230101");
//!     let json = info.images(&query).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Filter Expressions
//!
//! A filter expression is a comma-separated list of `attr<op>value` phrases.
//! All phrases must hold for a record to be kept.
//!
//! | Attribute | Operators | Value |
//! |-----------|-----------|-------|
//! | `id`, `replacementid` | `=` | any text |
//! | `ip` | `=` | dotted quad |
//! | `name`, `replacementname` | `~` (substring) | any text |
//! | `publishedon`, `deprecatedon`, `deletedon` | `<`, `=`, `>` | integer date, e.g. `20200101` |
//!
//! Phrases that fit none of these rules are logged as warnings and ignored.

mod client;
mod codec;
mod error;
pub mod filter;
mod info;
mod request;

pub use client::{InfoClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use codec::{decode, encode};
pub use error::InfoError;
pub use filter::{apply_filters, FilterChain, FilterDescriptor, Operator, Record};
pub use info::PublicCloudInfo;
pub use request::{InfoType, OutputFormat, Query, ALL_REGIONS, API_VERSION};
