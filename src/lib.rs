//! # mailharvest - website email extraction
//!
//! This crate fetches a list of web pages, pulls the email addresses out of
//! their `mailto:` links and visible text, and exports the collected
//! (website, email) pairs as an `.xlsx` spreadsheet.
//!
//! ## Features
//!
//! - One HTTP GET per URL with a fixed timeout, processed strictly in order
//! - Lenient HTML parsing that tolerates broken markup
//! - Exact-string deduplication of mailto targets and regex matches
//! - Per-URL failures are collected, never abort the batch
//! - In-memory xlsx export ready for download or writing to disk
//!
//! ## Example
//!
//! ```rust,no_run
//! use mailharvest::extractor::{EmailExtractor, ExtractorConfig};
//! use mailharvest::pipeline::{extract_all, parse_url_list};
//! use mailharvest::report::build_report;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let urls = parse_url_list("https://example.com\n\n  https://example.org  ")?;
//!     let extractor = EmailExtractor::new(ExtractorConfig::default())?;
//!
//!     let run = extract_all(&extractor, &urls, |_| {}).await;
//!     if !run.records.is_empty() {
//!         let report = build_report(&run.records)?;
//!         report.write_to(report.file_name())?;
//!     }
//!     Ok(())
//! }
//! ```

mod error;

pub mod extractor;
pub mod pipeline;
pub mod report;

pub use error::Error;
pub use pipeline::EmailRecord;

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
