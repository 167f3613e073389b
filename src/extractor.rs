//! # Email Extractor Module
//!
//! This module turns a single URL into the set of email addresses found on
//! that page. It is the leaf of the harvesting pipeline: the pipeline calls
//! it once per URL and tabulates whatever comes back.
//!
//! ## Key Components
//!
//! - `ExtractorConfig`: Timeout and user agent for the page fetch
//! - `EmailExtractor`: Fetches a page and runs the HTML extraction on it
//! - `extract_emails_from_html`: The pure extraction over an HTML document
//!
//! ## Extraction rules
//!
//! - Every `<a href="mailto:...">` contributes the text after the prefix,
//!   verbatim and unvalidated
//! - The flattened document text is scanned with [`EMAIL_PATTERN`]
//! - Both sources are merged into one set keyed by exact string equality

mod config;
mod error;
mod fetch;
mod html;

pub use config::{ExtractorConfig, ExtractorConfigBuilder};
pub use error::{ExtractError, FetchError};
pub use fetch::PageFetcher;
pub use html::{EMAIL_PATTERN, MAILTO_PREFIX, extract_emails_from_html};

use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Fetches pages and extracts the email addresses on them
#[derive(Debug, Clone)]
pub struct EmailExtractor {
    fetcher: PageFetcher,
}

impl EmailExtractor {
    /// Create an extractor with the given configuration
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractError> {
        Ok(Self {
            fetcher: PageFetcher::new(&config)?,
        })
    }

    /// Fetch `url` once and return the unique emails found on the page
    ///
    /// An empty set is a normal outcome. Network, timeout and HTTP status
    /// failures come back as [`ExtractError::Fetch`].
    #[instrument(skip(self))]
    pub async fn extract_emails(&self, url: &str) -> Result<BTreeSet<String>, ExtractError> {
        let html = self.fetcher.fetch(url).await?;
        let emails = extract_emails_from_html(&html)?;
        debug!("Found {} emails on {}", emails.len(), url);
        Ok(emails)
    }
}
