//! Geocoding clients.
//!
//! The resolver only reaches the network for postcodes that neither the
//! library nor the missing cache know. Lookups go through the
//! [`Geocoder`] trait so tests and offline runs can substitute a
//! [`StaticGeocoder`] for the Nominatim client.

mod client;
mod error;
mod mock;

use std::future::Future;

use crate::domain::Coordinate;

pub use client::{NominatimClient, NominatimConfig};
pub use error::GeocodeError;
pub use mock::StaticGeocoder;

/// Free-text address lookup.
pub trait Geocoder {
    /// Look up a free-text query such as `"0800, Australia"`.
    ///
    /// Returns `Ok(None)` when the service answered but found nothing.
    fn geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, GeocodeError>> + Send;
}
