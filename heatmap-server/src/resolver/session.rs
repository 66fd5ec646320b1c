//! Per-session selection cache.

use std::collections::HashMap;

use crate::domain::Coordinate;

use super::selection::SelectionStrategy;

/// Coordinates chosen so far in one session, keyed by normalized postcode.
///
/// Once a postcode has a coordinate here it keeps it for the rest of the
/// session, so every row sharing the postcode lands on the same point.
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    selected: HashMap<String, Coordinate>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The coordinate already chosen for a postcode.
    pub fn get(&self, postcode: &str) -> Option<Coordinate> {
        self.selected.get(postcode).copied()
    }

    /// Choose among `candidates` and fix the choice for `postcode`.
    pub(crate) fn fix(
        &mut self,
        postcode: &str,
        candidates: &[Coordinate],
        selection: &mut dyn SelectionStrategy,
    ) -> Option<Coordinate> {
        let chosen = selection.select(candidates)?;
        self.selected.insert(postcode.to_string(), chosen);
        Some(chosen)
    }

    /// Number of postcodes with a fixed coordinate.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
