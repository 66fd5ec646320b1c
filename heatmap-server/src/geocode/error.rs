//! Geocoding client error types.

use std::fmt;

use crate::domain::InvalidCoordinate;

/// Errors from a geocoding lookup.
///
/// These describe a failed lookup, as opposed to a lookup that succeeded
/// and found nothing (`Ok(None)`).
#[derive(Debug)]
pub enum GeocodeError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    Api { status: u16, message: String },

    /// Rate limited by the API
    RateLimited,

    /// Request rejected, usually for a missing or generic User-Agent
    Blocked,

    /// The API answered with a coordinate outside the valid range
    InvalidCoordinate(InvalidCoordinate),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::Http(e) => write!(f, "HTTP error: {e}"),
            GeocodeError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            GeocodeError::Api { status, message } => write!(f, "API error {status}: {message}"),
            GeocodeError::RateLimited => write!(f, "rate limited by geocoding API"),
            GeocodeError::Blocked => write!(f, "request blocked (check the User-Agent)"),
            GeocodeError::InvalidCoordinate(e) => write!(f, "geocoder returned {e}"),
        }
    }
}

impl std::error::Error for GeocodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeocodeError::Http(e) => Some(e),
            GeocodeError::InvalidCoordinate(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        GeocodeError::Http(err)
    }
}

impl From<InvalidCoordinate> for GeocodeError {
    fn from(err: InvalidCoordinate) -> Self {
        GeocodeError::InvalidCoordinate(err)
    }
}
