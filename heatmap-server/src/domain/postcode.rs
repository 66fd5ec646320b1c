//! Postcode normalization.

use std::fmt;

use super::Country;

/// A postcode in its canonical per-country form.
///
/// Normalization never fails: raw cell values are trimmed, spreadsheet
/// float artefacts such as `"800.0"` are reduced to their integer part,
/// and the result is left-padded with zeros to the country's width.
/// Empty input stays empty.
///
/// # Examples
///
/// ```
/// use heatmap_server::domain::{Country, Postcode};
///
/// let pc = Postcode::normalize("800", Country::Australia);
/// assert_eq!(pc.as_str(), "0800");
/// assert_eq!(pc.fallback(), Some("800"));
///
/// let pc = Postcode::normalize("501", Country::UnitedStates);
/// assert_eq!(pc.as_str(), "00501");
///
/// let pc = Postcode::normalize(" SW1A 1AA ", Country::UnitedKingdom);
/// assert_eq!(pc.as_str(), "SW1A 1AA");
/// assert_eq!(pc.fallback(), None);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Postcode(String);

impl Postcode {
    /// Normalize a raw cell value for the given country.
    pub fn normalize(raw: &str, country: Country) -> Self {
        let trimmed = strip_float_suffix(raw.trim());

        if trimmed.is_empty() {
            return Postcode(String::new());
        }

        match country.pad_width() {
            Some(width) => Postcode(format!("{trimmed:0>width$}")),
            None => Postcode(trimmed.to_string()),
        }
    }

    /// The canonical postcode string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the postcode is empty (blank input).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The postcode with leading zeros stripped, e.g. `0800` → `800`.
    ///
    /// Returns `None` when stripping changes nothing or leaves nothing.
    pub fn fallback(&self) -> Option<&str> {
        let stripped = self.0.trim_start_matches('0');
        if stripped.is_empty() || stripped.len() == self.0.len() {
            None
        } else {
            Some(stripped)
        }
    }
}

/// Reduce `"<digits>.<zeros>"` to `"<digits>"`.
///
/// Numeric postcode columns exported from spreadsheets often arrive as
/// floats (`800.0`); anything else is returned unchanged. An empty
/// integer part (`".0"`) reads as `"0"`, so padding the result cannot
/// produce a new float on the next pass.
fn strip_float_suffix(s: &str) -> &str {
    match s.split_once('.') {
        Some((int, frac))
            if int.bytes().all(|b| b.is_ascii_digit()) && frac.bytes().all(|b| b == b'0') =>
        {
            if int.is_empty() { "0" } else { int }
        }
        _ => s,
    }
}

impl fmt::Debug for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Postcode({})", self.0)
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn au(s: &str) -> String {
        Postcode::normalize(s, Country::Australia).as_str().to_string()
    }

    #[test]
    fn pads_australia_and_new_zealand() {
        assert_eq!(au("800"), "0800");
        assert_eq!(au("2000"), "2000");
        assert_eq!(
            Postcode::normalize("600", Country::NewZealand).as_str(),
            "0600"
        );
    }

    #[test]
    fn pads_united_states() {
        assert_eq!(
            Postcode::normalize("501", Country::UnitedStates).as_str(),
            "00501"
        );
        assert_eq!(
            Postcode::normalize("90210", Country::UnitedStates).as_str(),
            "90210"
        );
    }

    #[test]
    fn trims_without_padding_elsewhere() {
        assert_eq!(
            Postcode::normalize("  K1A 0B1 ", Country::Canada).as_str(),
            "K1A 0B1"
        );
        assert_eq!(
            Postcode::normalize("0123", Country::UnitedKingdom).as_str(),
            "0123"
        );
    }

    #[test]
    fn longer_than_width_is_unchanged() {
        assert_eq!(au("123456"), "123456");
    }

    #[test]
    fn strips_spreadsheet_float_suffix() {
        assert_eq!(au("800.0"), "0800");
        assert_eq!(au("3000.00"), "3000");
        // Not an integral float
        assert_eq!(au("80.5"), "80.5");
        assert_eq!(au(".0"), "0000");
        assert_eq!(au("."), "0000");
        assert_eq!(au("1.0.0"), "1.0.0");
    }

    #[test]
    fn bare_fraction_normalizes_once() {
        let once = Postcode::normalize(".0", Country::Australia);
        let twice = Postcode::normalize(once.as_str(), Country::Australia);
        assert_eq!(once, twice);
        assert_eq!(Postcode::normalize(".00", Country::Canada).as_str(), "0");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(Postcode::normalize("", Country::Australia).is_empty());
        assert!(Postcode::normalize("   ", Country::UnitedStates).is_empty());
        assert!(Postcode::normalize("0.0", Country::Canada).as_str() == "0");
    }

    #[test]
    fn fallback_strips_leading_zeros() {
        let pc = Postcode::normalize("800", Country::Australia);
        assert_eq!(pc.fallback(), Some("800"));

        let pc = Postcode::normalize("00501", Country::UnitedStates);
        assert_eq!(pc.fallback(), Some("501"));
    }

    #[test]
    fn no_fallback_when_nothing_to_strip() {
        assert_eq!(Postcode::normalize("2000", Country::Australia).fallback(), None);
        assert_eq!(Postcode::normalize("0000", Country::Australia).fallback(), None);
        assert_eq!(Postcode::normalize("", Country::Australia).fallback(), None);
    }

    #[test]
    fn display_and_debug() {
        let pc = Postcode::normalize("800", Country::Australia);
        assert_eq!(format!("{pc}"), "0800");
        assert_eq!(format!("{pc:?}"), "Postcode(0800)");
    }
}
