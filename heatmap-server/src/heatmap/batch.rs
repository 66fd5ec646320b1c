//! Resolve a whole postcode column.

use tracing::{info, warn};

use crate::domain::Coordinate;
use crate::geocode::Geocoder;
use crate::resolver::{PostcodeResolver, Resolution};
use crate::store::StoreError;

/// A row that resolved to a coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRow {
    /// 1-based row number in the upload
    pub row_id: usize,
    pub coordinate: Coordinate,
}

/// Result of resolving every row of an upload.
///
/// Unresolved rows are dropped; only their counts are kept.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub resolved: Vec<ResolvedRow>,
    /// Rows no store or geocoder knew
    pub not_found: usize,
    /// Rows whose geocoder lookup failed
    pub lookup_failed: usize,
}

impl BatchOutcome {
    /// Total number of rows processed.
    pub fn total(&self) -> usize {
        self.resolved.len() + self.not_found + self.lookup_failed
    }
}

/// Resolve each `(row_id, raw_postcode)` in order, one at a time.
///
/// Each geocoder call completes before the next row starts. Store
/// failures abort the batch.
pub async fn resolve_rows<'a, G, I>(
    resolver: &mut PostcodeResolver<G>,
    rows: I,
) -> Result<BatchOutcome, StoreError>
where
    G: Geocoder,
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let mut outcome = BatchOutcome::default();

    for (row_id, raw) in rows {
        match resolver.resolve(raw).await? {
            Resolution::Resolved { coordinate, .. } => {
                outcome.resolved.push(ResolvedRow { row_id, coordinate });
            }
            Resolution::NotFound => outcome.not_found += 1,
            Resolution::LookupFailed(e) => {
                warn!(row_id, raw, error = %e, "dropping row after failed lookup");
                outcome.lookup_failed += 1;
            }
        }
    }

    info!(
        country = %resolver.country(),
        rows = outcome.total(),
        resolved = outcome.resolved.len(),
        not_found = outcome.not_found,
        lookup_failed = outcome.lookup_failed,
        "resolved upload"
    );

    Ok(outcome)
}
