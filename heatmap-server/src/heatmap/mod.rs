//! Heatmap aggregation.
//!
//! Resolves an upload's postcode column row by row, then turns the
//! resolved coordinates into weighted points and a map centre. Rendering
//! the map is left to the caller.

mod aggregate;
mod batch;
mod intensity;

pub use aggregate::{HeatPoint, Heatmap, HeatmapError, NO_RESULTS_MESSAGE};
pub use batch::{BatchOutcome, ResolvedRow, resolve_rows};
pub use intensity::{Intensity, InvalidIntensity};
