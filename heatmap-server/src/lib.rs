//! Postcode heatmap server.
//!
//! Resolves a column of postal codes to coordinates, through a local
//! library, a cache of previously geocoded postcodes and finally a
//! Nominatim geocoder, and aggregates the result into heatmap data.

pub mod config;
pub mod domain;
pub mod geocode;
pub mod heatmap;
pub mod resolver;
pub mod store;
pub mod upload;
pub mod web;
