//! Upload parsing errors.

/// Errors reading an uploaded postcode table.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Not readable as CSV
    #[error("could not read upload: {0}")]
    Csv(#[from] csv::Error),

    /// Not readable as an xlsx workbook
    #[error("could not read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    /// No header row
    #[error("upload is empty")]
    Empty,

    /// Requested column isn't in the header
    #[error("unknown column {name:?} (available: {})", .available.join(", "))]
    UnknownColumn {
        name: String,
        available: Vec<String>,
    },
}
