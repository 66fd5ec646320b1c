//! HTTP route handlers.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{error, warn};

use crate::domain::Country;
use crate::heatmap::{Heatmap, HeatmapError, Intensity, resolve_rows};
use crate::resolver::PostcodeResolver;
use crate::store::StoreError;
use crate::upload::{UploadError, UploadTable};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/countries", get(list_countries))
        .route("/api/heatmap", post(build_heatmap))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List supported countries.
async fn list_countries() -> Json<CountriesResponse> {
    let countries = Country::ALL
        .into_iter()
        .map(CountryResult::from_country)
        .collect();
    Json(CountriesResponse { countries })
}

/// Resolve an uploaded table's postcode column and return heatmap data.
///
/// The request body is the CSV or xlsx file itself. Each request is its own
/// session: repeated postcodes within one upload share a coordinate.
async fn build_heatmap(
    State(state): State<AppState>,
    query: Result<Query<HeatmapRequest>, QueryRejection>,
    body: Bytes,
) -> Result<Json<HeatmapResponse>, AppError> {
    let Query(req) = query?;
    let country = Country::parse(&req.country).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let intensity = req
        .intensity
        .map(Intensity::new)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?
        .unwrap_or_default();

    let table = UploadTable::from_bytes(&body)?;
    let column = match req.column.as_deref() {
        Some(column) => column,
        None => table.guess_postcode_column(),
    };
    let cells = table.column(column)?;

    let library = state.stores.library(country).await?;
    let missing = state.stores.missing_cache(country).await?;
    let mut resolver = PostcodeResolver::new(country, library, missing, state.geocoder.clone())
        .with_selection(state.selection.strategy());

    let outcome = resolve_rows(&mut resolver, cells).await?;
    let heatmap = Heatmap::build(&outcome.resolved, intensity, country)?;

    Ok(Json(HeatmapResponse::new(&heatmap, &outcome)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unprocessable { message: String },
    Internal { message: String },
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<HeatmapError> for AppError {
    fn from(e: HeatmapError) -> Self {
        AppError::Unprocessable {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unprocessable { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
