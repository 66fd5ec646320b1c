//! Postcode coordinate stores.
//!
//! Two CSV-backed stores feed the resolver: a read-only library of known
//! postcodes, and an append-only missing cache of postcodes previously
//! answered by the geocoder.

mod error;
mod library;
mod missing;
mod record;
mod registry;

pub use error::StoreError;
pub use library::PostcodeLibrary;
pub use missing::{MissingCache, SharedMissingCache};
pub use registry::{StoreConfig, StoreRegistry};
