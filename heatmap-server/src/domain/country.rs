//! Supported countries and their postcode conventions.

use std::fmt;

/// Error returned when parsing an unsupported country.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported country: {input}")]
pub struct InvalidCountry {
    input: String,
}

/// A country the heatmap can geocode postcodes for.
///
/// Each country carries the name sent to the geocoder, the fixed width
/// its numeric postcodes are zero-padded to, and a default map zoom.
///
/// # Examples
///
/// ```
/// use heatmap_server::domain::Country;
///
/// let au = Country::parse("au").unwrap();
/// assert_eq!(au, Country::Australia);
/// assert_eq!(au.name(), "Australia");
/// assert_eq!(au.pad_width(), Some(4));
///
/// assert_eq!(Country::parse("United States").unwrap().pad_width(), Some(5));
/// assert_eq!(Country::parse("UK").unwrap().pad_width(), None);
/// assert!(Country::parse("Atlantis").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Country {
    Australia,
    UnitedKingdom,
    UnitedStates,
    Canada,
    NewZealand,
}

impl Country {
    /// All supported countries, in display order.
    pub const ALL: [Country; 5] = [
        Country::Australia,
        Country::UnitedKingdom,
        Country::UnitedStates,
        Country::Canada,
        Country::NewZealand,
    ];

    /// Parse a country from its code or a common name (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, InvalidCountry> {
        let key = s.trim().to_ascii_lowercase();
        let country = match key.as_str() {
            "au" | "aus" | "australia" => Country::Australia,
            "gb" | "uk" | "united kingdom" | "great britain" => Country::UnitedKingdom,
            "us" | "usa" | "united states" | "united states of america" => {
                Country::UnitedStates
            }
            "ca" | "can" | "canada" => Country::Canada,
            "nz" | "nzl" | "new zealand" => Country::NewZealand,
            _ => {
                return Err(InvalidCountry {
                    input: s.to_string(),
                });
            }
        };
        Ok(country)
    }

    /// ISO 3166-1 alpha-2 code.
    pub fn code(&self) -> &'static str {
        match self {
            Country::Australia => "AU",
            Country::UnitedKingdom => "GB",
            Country::UnitedStates => "US",
            Country::Canada => "CA",
            Country::NewZealand => "NZ",
        }
    }

    /// Name used in geocoder queries and export filenames.
    pub fn name(&self) -> &'static str {
        match self {
            Country::Australia => "Australia",
            Country::UnitedKingdom => "UK",
            Country::UnitedStates => "United States",
            Country::Canada => "Canada",
            Country::NewZealand => "New Zealand",
        }
    }

    /// Key used for per-country store filenames (`au`, `gb`, ...).
    pub fn file_key(&self) -> String {
        self.code().to_ascii_lowercase()
    }

    /// Width numeric postcodes are left-padded to with zeros.
    ///
    /// `None` means postcodes are only trimmed.
    pub fn pad_width(&self) -> Option<usize> {
        match self {
            Country::Australia | Country::NewZealand => Some(4),
            Country::UnitedStates => Some(5),
            Country::UnitedKingdom | Country::Canada => None,
        }
    }

    /// Initial zoom level for a map covering this country.
    pub fn default_zoom(&self) -> u8 {
        match self {
            Country::Australia => 5,
            _ => 6,
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
