//! Domain types for the postcode heatmap.
//!
//! This module contains the value types shared by every layer: the
//! supported countries, normalized postcodes, and validated coordinates.
//! All types enforce their invariants at construction time.

mod coordinate;
mod country;
mod postcode;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use country::{Country, InvalidCountry};
pub use postcode::Postcode;
