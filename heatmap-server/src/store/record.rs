//! CSV record format shared by the library and missing-cache files.
//!
//! Both files hold one `postcode,lat,lon` row per candidate coordinate.
//! Postcodes are kept as strings so leading zeros survive.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Coordinate;

use super::error::StoreError;

/// Candidate coordinates keyed by postcode, in file order.
pub(crate) type CandidateMap = HashMap<String, Vec<Coordinate>>;

#[derive(Debug, Serialize, Deserialize)]
struct CoordinateRecord {
    postcode: String,
    lat: f64,
    lon: f64,
}

/// Read every record in `path` into a candidate map.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub(crate) fn read_candidates(path: &Path) -> Result<Option<CandidateMap>, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut candidates = CandidateMap::new();
    for (index, result) in reader.deserialize::<CoordinateRecord>().enumerate() {
        let record = result.map_err(|e| StoreError::csv(path, e))?;
        // Header is line 1
        let line = index as u64 + 2;

        if record.postcode.is_empty() {
            return Err(StoreError::InvalidRecord {
                path: path.to_path_buf(),
                line,
                reason: "empty postcode".to_string(),
            });
        }

        let coordinate =
            Coordinate::new(record.lat, record.lon).map_err(|e| StoreError::InvalidRecord {
                path: path.to_path_buf(),
                line,
                reason: e.to_string(),
            })?;

        candidates
            .entry(record.postcode)
            .or_default()
            .push(coordinate);
    }

    Ok(Some(candidates))
}

/// Append one record to `path`, creating the file (with header) if needed.
///
/// The row is serialized up front and written with a single append-mode
/// write, so concurrent writers can only interleave whole rows.
pub(crate) fn append_candidate(
    path: &Path,
    postcode: &str,
    coordinate: Coordinate,
) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;

    let is_new = file.metadata().map_err(|e| StoreError::io(path, e))?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(Vec::new());
    writer
        .serialize(CoordinateRecord {
            postcode: postcode.to_string(),
            lat: coordinate.latitude(),
            lon: coordinate.longitude(),
        })
        .map_err(|e| StoreError::csv(path, e))?;
    let row = writer
        .into_inner()
        .map_err(|e| StoreError::io(path, e.into_error()))?;

    file.write_all(&row).map_err(|e| StoreError::io(path, e))?;
    file.flush().map_err(|e| StoreError::io(path, e))?;

    Ok(())
}
