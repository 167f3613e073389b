//! Error types for the extractor module

use std::time::Duration;
use thiserror::Error;

/// Failure to retrieve a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The server answered with a non-success status
    #[error("HTTP status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// No complete response within the configured timeout
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Transport failure (DNS, connection refused, TLS, body read)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Error type for extracting emails from one URL
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The document could not be processed
    #[error("HTML parsing error: {0}")]
    Parse(String),

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}
