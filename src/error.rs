//! Error types for the mailharvest crate

use thiserror::Error;

use crate::pipeline::InputError;
use crate::report::ReportError;

/// Result type for mailharvest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for a harvesting run
///
/// Per-URL extraction failures never surface here; they are accumulated in
/// [`crate::pipeline::ExtractionRun::failures`] instead. Only problems that
/// stop the whole run end up as an `Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// The URL list was unusable
    #[error(transparent)]
    Input(#[from] InputError),

    /// The spreadsheet could not be produced
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}
