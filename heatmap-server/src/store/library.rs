//! Read-only postcode library.

use std::path::Path;

use tracing::{info, warn};

use crate::domain::Coordinate;

use super::error::StoreError;
use super::record::{CandidateMap, read_candidates};

/// Pre-built postcode → candidate coordinates mapping.
///
/// A postcode may span several localities, so each entry holds one or
/// more candidates in file order. Keys are stored exactly as they appear
/// in the file (trimmed), which is why lookups try both the padded and
/// the leading-zero-stripped form.
#[derive(Debug, Clone, Default)]
pub struct PostcodeLibrary {
    entries: CandidateMap,
}

impl PostcodeLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a library file.
    ///
    /// A missing file yields an empty library; a malformed one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        match read_candidates(path)? {
            Some(entries) => {
                info!(path = %path.display(), postcodes = entries.len(), "loaded postcode library");
                Ok(Self { entries })
            }
            None => {
                warn!(path = %path.display(), "postcode library not found, starting empty");
                Ok(Self::new())
            }
        }
    }

    /// Add a candidate coordinate for a postcode.
    pub fn insert(&mut self, postcode: impl Into<String>, coordinate: Coordinate) {
        self.entries.entry(postcode.into()).or_default().push(coordinate);
    }

    /// Candidates for an exact postcode key.
    pub fn candidates(&self, postcode: &str) -> Option<&[Coordinate]> {
        self.entries.get(postcode).map(Vec::as_slice)
    }

    /// Number of distinct postcodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Coordinate)> for PostcodeLibrary {
    fn from_iter<I: IntoIterator<Item = (String, Coordinate)>>(iter: I) -> Self {
        let mut library = Self::new();
        for (postcode, coordinate) in iter {
            library.insert(postcode, coordinate);
        }
        library
    }
}
