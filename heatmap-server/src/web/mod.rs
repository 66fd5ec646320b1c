//! Web layer for the postcode heatmap server.
//!
//! Provides HTTP endpoints for listing countries and turning an uploaded
//! CSV or xlsx file of postcodes into heatmap data.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
