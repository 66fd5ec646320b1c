//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::Country;
use crate::heatmap::{BatchOutcome, Heatmap, ResolvedRow};

/// Query parameters for building a heatmap from an uploaded CSV or xlsx body.
#[derive(Debug, Deserialize)]
pub struct HeatmapRequest {
    /// Country code or name (e.g. "AU", "New Zealand")
    pub country: String,

    /// Postcode column header (guessed when absent)
    pub column: Option<String>,

    /// Gradient intensity 1-10 (defaults to 5)
    pub intensity: Option<i64>,
}

/// A supported country.
#[derive(Debug, Serialize)]
pub struct CountryResult {
    /// ISO country code
    pub code: String,

    /// Display name, also used in geocoder queries
    pub name: String,

    /// Zero-pad width for numeric postcodes
    pub pad_width: Option<usize>,

    /// Default map zoom
    pub zoom: u8,
}

impl CountryResult {
    pub fn from_country(country: Country) -> Self {
        Self {
            code: country.code().to_string(),
            name: country.name().to_string(),
            pad_width: country.pad_width(),
            zoom: country.default_zoom(),
        }
    }
}

/// Response listing supported countries.
#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub countries: Vec<CountryResult>,
}

/// A resolved upload row.
#[derive(Debug, Serialize)]
pub struct RowResult {
    /// 1-based row number in the upload
    pub row: usize,
    pub lat: f64,
    pub lon: f64,
}

impl RowResult {
    pub fn from_row(row: &ResolvedRow) -> Self {
        Self {
            row: row.row_id,
            lat: row.coordinate.latitude(),
            lon: row.coordinate.longitude(),
        }
    }
}

/// Heatmap data for a renderer.
#[derive(Debug, Serialize)]
pub struct HeatmapResponse {
    /// Country name
    pub country: String,

    /// Suggested filename for the exported map
    pub filename: String,

    /// Initial map zoom
    pub zoom: u8,

    /// Map centre as `[lat, lon]`
    pub center: [f64; 2],

    /// Weighted points as `[lat, lon, weight]`
    pub points: Vec<[f64; 3]>,

    /// Resolved rows
    pub rows: Vec<RowResult>,

    /// Number of rows resolved
    pub resolved: usize,

    /// Number of rows nothing knew
    pub not_found: usize,

    /// Number of rows whose geocoder lookup failed
    pub lookup_failed: usize,
}

impl HeatmapResponse {
    pub fn new(heatmap: &Heatmap, outcome: &BatchOutcome) -> Self {
        Self {
            country: heatmap.country.name().to_string(),
            filename: heatmap.export_filename(),
            zoom: heatmap.zoom,
            center: [heatmap.center.latitude(), heatmap.center.longitude()],
            points: heatmap
                .points
                .iter()
                .map(|p| {
                    [
                        p.coordinate.latitude(),
                        p.coordinate.longitude(),
                        f64::from(p.weight),
                    ]
                })
                .collect(),
            rows: outcome.resolved.iter().map(RowResult::from_row).collect(),
            resolved: outcome.resolved.len(),
            not_found: outcome.not_found,
            lookup_failed: outcome.lookup_failed,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
