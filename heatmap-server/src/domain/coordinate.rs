//! Geographic coordinates.

use std::fmt;

/// Error returned when a latitude/longitude pair is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
pub struct InvalidCoordinate {
    latitude: f64,
    longitude: f64,
    reason: &'static str,
}

/// A (latitude, longitude) pair in degrees.
///
/// Both components are finite, latitude lies in [-90, 90] and longitude
/// in [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, validating its range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let invalid = |reason| InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("components must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Arithmetic mean of a set of coordinates.
    ///
    /// Returns `None` for an empty slice.
    pub fn mean(coords: &[Coordinate]) -> Option<Coordinate> {
        if coords.is_empty() {
            return None;
        }
        let n = coords.len() as f64;
        let (lat_sum, lon_sum) = coords
            .iter()
            .fold((0.0, 0.0), |(lat, lon), c| (lat + c.latitude, lon + c.longitude));

        // The mean of in-range values is in range
        Some(Coordinate {
            latitude: lat_sum / n,
            longitude: lon_sum / n,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_coordinates() {
        let darwin = Coordinate::new(-12.4634, 130.8456).unwrap();
        assert_eq!(darwin.latitude(), -12.4634);
        assert_eq!(darwin.longitude(), 130.8456);

        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn reject_out_of_range() {
        assert!(Coordinate::new(90.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
    }

    #[test]
    fn reject_non_finite() {
        let err = Coordinate::new(f64::NAN, 0.0).unwrap_err();
        assert!(err.to_string().contains("finite"));
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn mean_of_points() {
        let coords = [
            Coordinate::new(-30.0, 150.0).unwrap(),
            Coordinate::new(-34.0, 140.0).unwrap(),
        ];
        let center = Coordinate::mean(&coords).unwrap();
        assert_eq!(center.latitude(), -32.0);
        assert_eq!(center.longitude(), 145.0);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert!(Coordinate::mean(&[]).is_none());
    }

    #[test]
    fn display() {
        let c = Coordinate::new(1.5, -2.25).unwrap();
        assert_eq!(c.to_string(), "(1.5, -2.25)");
    }
}
