//! Uploaded postcode table.

use std::io::{Cursor, Read, Seek};

use calamine::{Data, Reader, Xlsx};

use super::error::UploadError;

/// Leading bytes of a ZIP archive, and so of every xlsx workbook.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Header fragments that mark a likely postcode column.
const POSTCODE_HINTS: [&str; 4] = ["postcode", "post code", "postal", "zip"];

/// An uploaded table (CSV or xlsx): a header row plus data rows.
///
/// Only the postcode column is ever used; other columns are carried
/// along untouched. Short rows are allowed and read as empty cells.
#[derive(Debug, Clone)]
pub struct UploadTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl UploadTable {
    /// Parse a CSV upload with a header row.
    pub fn from_reader(reader: impl Read) -> Result<Self, UploadError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.iter().all(String::is_empty) {
            return Err(UploadError::Empty);
        }

        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, _>>()?;

        Ok(Self { headers, rows })
    }

    /// Parse the first worksheet of an xlsx workbook.
    ///
    /// The first row holds the headers. Numeric cells become their
    /// shortest decimal form, so `800` stays `800`.
    pub fn from_xlsx<R: Read + Seek>(reader: R) -> Result<Self, UploadError> {
        let mut workbook: Xlsx<R> = Xlsx::new(reader)?;
        let range = workbook.worksheet_range_at(0).ok_or(UploadError::Empty)??;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header) => header.iter().map(|c| cell_text(c).trim().to_string()).collect(),
            None => return Err(UploadError::Empty),
        };

        if headers.iter().all(String::is_empty) {
            return Err(UploadError::Empty);
        }

        let rows = rows
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        Ok(Self { headers, rows })
    }

    /// Parse an upload of either format, sniffing xlsx by its ZIP header.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, UploadError> {
        if bytes.starts_with(ZIP_MAGIC) {
            Self::from_xlsx(Cursor::new(bytes))
        } else {
            Self::from_reader(bytes)
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of a column as `(row_id, value)`, row ids starting at 1.
    ///
    /// Matches the header exactly first, then ignoring case.
    pub fn column(&self, name: &str) -> Result<Vec<(usize, &str)>, UploadError> {
        let wanted = name.trim();
        let index = self
            .headers
            .iter()
            .position(|h| h == wanted)
            .or_else(|| {
                self.headers
                    .iter()
                    .position(|h| h.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| UploadError::UnknownColumn {
                name: name.to_string(),
                available: self.headers.clone(),
            })?;

        Ok(self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i + 1, row.get(index).map(String::as_str).unwrap_or("")))
            .collect())
    }

    /// Best guess at the postcode column: the first header mentioning a
    /// postcode, else the first column.
    pub fn guess_postcode_column(&self) -> &str {
        self.headers
            .iter()
            .find(|h| {
                let lower = h.to_ascii_lowercase();
                POSTCODE_HINTS.iter().any(|hint| lower.contains(hint))
            })
            .unwrap_or(&self.headers[0])
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}
