//! Heatmap gradient intensity.

use std::fmt;

/// Error returned for an intensity outside 1..=10.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "intensity must be between {min} and {max}, got {value}",
    min = Intensity::MIN,
    max = Intensity::MAX
)]
pub struct InvalidIntensity {
    value: i64,
}

/// Weight given to every resolved point, from 1 to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Validate an intensity value.
    pub fn new(value: i64) -> Result<Self, InvalidIntensity> {
        match u8::try_from(value) {
            Ok(v) if (Self::MIN..=Self::MAX).contains(&v) => Ok(Intensity(v)),
            _ => Err(InvalidIntensity { value }),
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Intensity(5)
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_range() {
        assert_eq!(Intensity::new(1).unwrap().get(), 1);
        assert_eq!(Intensity::new(10).unwrap().get(), 10);
        assert_eq!(Intensity::default().get(), 5);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Intensity::new(0).is_err());
        assert!(Intensity::new(11).is_err());
        let err = Intensity::new(-3).unwrap_err();
        assert_eq!(err.to_string(), "intensity must be between 1 and 10, got -3");
    }
}
