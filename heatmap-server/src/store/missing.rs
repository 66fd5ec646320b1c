//! Append-only cache of postcodes resolved through the geocoder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::Coordinate;

use super::error::StoreError;
use super::record::{CandidateMap, append_candidate, read_candidates};

/// A missing cache shared between resolvers.
pub type SharedMissingCache = Arc<RwLock<MissingCache>>;

/// Postcodes the library didn't know, as previously answered by the geocoder.
///
/// Every new answer is written to disk as soon as it is recorded, so a
/// fresh run picks it up without calling the geocoder again.
#[derive(Debug)]
pub struct MissingCache {
    path: PathBuf,
    entries: CandidateMap,
}

impl MissingCache {
    /// Open the cache file at `path`, loading any existing rows.
    ///
    /// The file is not created until the first [`MissingCache::append`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = read_candidates(&path)?.unwrap_or_default();
        debug!(path = %path.display(), postcodes = entries.len(), "opened missing cache");
        Ok(Self { path, entries })
    }

    /// Candidates recorded for an exact postcode.
    pub fn candidates(&self, postcode: &str) -> Option<&[Coordinate]> {
        self.entries.get(postcode).map(Vec::as_slice)
    }

    /// Record a newly resolved coordinate, persisting it immediately.
    pub fn append(&mut self, postcode: &str, coordinate: Coordinate) -> Result<(), StoreError> {
        append_candidate(&self.path, postcode, coordinate)?;
        self.entries
            .entry(postcode.to_string())
            .or_default()
            .push(coordinate);
        Ok(())
    }

    /// Wrap the cache for sharing between resolvers.
    pub fn into_shared(self) -> SharedMissingCache {
        Arc::new(RwLock::new(self))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of distinct postcodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
