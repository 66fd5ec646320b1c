//! Application state for the web layer.

use std::sync::Arc;

use crate::geocode::NominatimClient;
use crate::resolver::SelectionMode;
use crate::store::StoreRegistry;

/// Shared application state.
///
/// Each request builds its own resolver (and so its own session cache)
/// from these shared pieces.
#[derive(Clone)]
pub struct AppState {
    /// Per-country library and missing-cache stores
    pub stores: Arc<StoreRegistry>,

    /// Geocoder used for postcodes no store knows
    pub geocoder: NominatimClient,

    /// Candidate selection policy for new sessions
    pub selection: SelectionMode,
}

impl AppState {
    /// Create a new app state.
    pub fn new(stores: StoreRegistry, geocoder: NominatimClient, selection: SelectionMode) -> Self {
        Self {
            stores: Arc::new(stores),
            geocoder,
            selection,
        }
    }
}
