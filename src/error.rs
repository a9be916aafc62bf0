//! Error types for public cloud info queries.

use thiserror::Error;

/// Errors that can occur while querying or filtering public cloud information.
#[derive(Debug, Error)]
pub enum InfoError {
    /// The server answered with an empty body.
    #[error("no data was returned by the server")]
    EmptyResponse,

    /// HTTP error with status code.
    #[error("http {0}")]
    Http(u16),

    /// HTTP request error.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A numeric comparison met a value that is not an integer literal.
    #[error("not an integer: {value:?}")]
    NotAnInteger { value: String },

    /// A record lacks an attribute referenced by a filter.
    #[error("record has no attribute {0:?}")]
    MissingAttribute(String),

    /// The response payload is not valid JSON or not a list of string records.
    #[error("json: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response payload has no list under the expected key.
    #[error("response has no {0:?} list")]
    MissingList(&'static str),

    /// Filter operator outside of `=`, `~`, `<` and `>`.
    #[error("unknown filter operator {0:?}")]
    UnknownOperator(String),

    /// XML encoding failed.
    #[error("xml: {0}")]
    Xml(String),
}
