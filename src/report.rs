//! # Report Builder
//!
//! Serializes extracted rows into an in-memory `.xlsx` workbook with a single
//! sheet holding a `Website` and an `Email` column. Rows keep the order they
//! were extracted in. The produced [`ReportArtifact`] carries the download
//! file name and MIME type alongside the bytes.

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::pipeline::EmailRecord;

/// File name offered for the export
pub const REPORT_FILE_NAME: &str = "emails_extracted.xlsx";

/// MIME type of the export
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Column headers, in order
pub const HEADERS: [&str; 2] = ["Website", "Email"];

/// Longest string Excel stores in a single cell, in characters
pub const MAX_CELL_CHARS: usize = 32_767;

const SHEET_NAME: &str = "Sheet1";

/// Error type for report generation
#[derive(Debug, Error)]
pub enum ReportError {
    /// Workbook serialization failed
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    /// Writing the artifact failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A generated spreadsheet ready to be offered for download
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    bytes: Vec<u8>,
}

impl ReportArtifact {
    /// Suggested file name for the download
    pub fn file_name(&self) -> &'static str {
        REPORT_FILE_NAME
    }

    /// MIME type for the download
    pub fn mime_type(&self) -> &'static str {
        XLSX_MIME_TYPE
    }

    /// Raw workbook bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A reader positioned at the start of the workbook
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.bytes.as_slice())
    }

    /// Consume the artifact, returning the workbook bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the workbook to `path`, replacing any existing file
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Build the two-column spreadsheet for `records`
///
/// The header row is always written. Callers are expected to skip the
/// export entirely when there is nothing to report. Values longer than
/// [`MAX_CELL_CHARS`] are truncated so one oversized match cannot fail the
/// whole export.
#[instrument(skip(records), fields(rows = records.len()))]
pub fn build_report(records: &[EmailRecord]) -> Result<ReportArtifact, ReportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let mut website_width = HEADERS[0].len();
    let mut email_width = HEADERS[1].len();
    for (row, record) in records.iter().enumerate() {
        let row = row as u32 + 1;
        worksheet.write_string(row, 0, fit_cell(&record.website))?;
        worksheet.write_string(row, 1, fit_cell(&record.email))?;
        website_width = website_width.max(record.website.chars().count());
        email_width = email_width.max(record.email.chars().count());
    }

    worksheet.set_column_width(0, column_width(website_width))?;
    worksheet.set_column_width(1, column_width(email_width))?;

    let bytes = workbook.save_to_buffer()?;
    debug!("Built report of {} bytes", bytes.len());
    Ok(ReportArtifact { bytes })
}

fn fit_cell(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            warn!(
                "Truncating {} character value to {} characters",
                value.chars().count(),
                MAX_CELL_CHARS
            );
            &value[..end]
        }
        None => value,
    }
}

fn column_width(chars: usize) -> f64 {
    (chars.min(80) + 2) as f64
}
