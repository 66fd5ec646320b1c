//! Heatmap point data and map centre.

use crate::domain::{Coordinate, Country};

use super::batch::ResolvedRow;
use super::intensity::Intensity;

/// Message shown when no postcode in an upload could be resolved.
pub const NO_RESULTS_MESSAGE: &str =
    "None of the postcodes could be geocoded. Please check the data or try a different country.";

/// Errors building a heatmap.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeatmapError {
    /// Every row failed to resolve; there is nothing to draw
    #[error("{}", NO_RESULTS_MESSAGE)]
    NoResults,
}

/// One weighted point for density rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub coordinate: Coordinate,
    pub weight: u8,
}

/// Everything a map renderer needs to draw the heatmap.
#[derive(Debug, Clone)]
pub struct Heatmap {
    pub country: Country,
    pub points: Vec<HeatPoint>,
    /// Mean of all resolved coordinates
    pub center: Coordinate,
    pub zoom: u8,
}

impl Heatmap {
    /// Weight each resolved row by `intensity` and centre the map on their mean.
    pub fn build(
        rows: &[ResolvedRow],
        intensity: Intensity,
        country: Country,
    ) -> Result<Self, HeatmapError> {
        let coordinates: Vec<Coordinate> = rows.iter().map(|r| r.coordinate).collect();
        let center = Coordinate::mean(&coordinates).ok_or(HeatmapError::NoResults)?;

        let points = coordinates
            .into_iter()
            .map(|coordinate| HeatPoint {
                coordinate,
                weight: intensity.get(),
            })
            .collect();

        Ok(Self {
            country,
            points,
            center,
            zoom: country.default_zoom(),
        })
    }

    /// Suggested filename for an exported map document.
    pub fn export_filename(&self) -> String {
        format!("heatmap_{}.html", self.country.name())
    }
}
