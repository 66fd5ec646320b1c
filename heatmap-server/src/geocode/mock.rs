//! Static geocoder for offline runs and tests.
//!
//! Answers queries from an in-memory table instead of the network, and
//! counts how often it was asked.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::Coordinate;

use super::Geocoder;
use super::error::GeocodeError;

/// Geocoder that serves fixed answers.
///
/// Unknown queries resolve to `Ok(None)`, so an empty `StaticGeocoder`
/// turns a run into a cache-only run. Clones share the call counter.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    answers: HashMap<String, Coordinate>,
    failing: HashSet<String>,
    calls: Arc<AtomicUsize>,
}

impl StaticGeocoder {
    /// A geocoder that knows nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `coordinate`.
    pub fn with_answer(mut self, query: impl Into<String>, coordinate: Coordinate) -> Self {
        self.answers.insert(query.into(), coordinate);
        self
    }

    /// Fail every lookup of `query` as if the service were unavailable.
    pub fn with_failure(mut self, query: impl Into<String>) -> Self {
        self.failing.insert(query.into());
        self
    }

    /// Number of lookups made so far, across all clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for StaticGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(query) {
            return Err(GeocodeError::Api {
                status: 503,
                message: format!("static failure for {query:?}"),
            });
        }

        Ok(self.answers.get(query).copied())
    }
}
