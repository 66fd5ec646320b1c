//! Layered postcode → coordinate resolution.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Coordinate, Country, Postcode};
use crate::geocode::{GeocodeError, Geocoder};
use crate::store::{PostcodeLibrary, SharedMissingCache, StoreError};

use super::selection::{RandomCandidate, SelectionStrategy};
use super::session::SessionCache;

/// Where a resolved coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Chosen earlier in the same session
    Session,
    /// Library, exact normalized postcode
    Library,
    /// Library, leading-zero-stripped postcode
    LibraryFallback,
    /// Postcode previously answered by the geocoder
    MissingCache,
    /// Live geocoder lookup
    Geocoder,
}

/// Outcome of resolving one postcode.
#[derive(Debug)]
pub enum Resolution {
    Resolved {
        coordinate: Coordinate,
        source: ResolutionSource,
    },
    /// No store knows the postcode and the geocoder found nothing
    NotFound,
    /// The geocoder lookup itself failed
    LookupFailed(GeocodeError),
}

impl Resolution {
    /// The resolved coordinate, if any.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Resolution::Resolved { coordinate, .. } => Some(*coordinate),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}

/// Resolves postcodes for one country within one session.
///
/// Lookup order, stopping at the first hit:
///
/// 1. the session cache (exact normalized postcode),
/// 2. the library (normalized, then leading-zero-stripped),
/// 3. the missing cache (normalized),
/// 4. the geocoder, queried as `"{postcode}, {country name}"`.
///
/// Library and missing-cache hits pick one candidate through the
/// selection strategy and fix it in the session cache. Geocoder answers
/// are appended to the missing cache and returned without a session
/// entry; a repeat in the same session then hits the missing cache.
///
/// Create one resolver per upload. The library and missing cache are
/// shared; the session cache is not. When two sessions geocode the same
/// new postcode at once, only the first answer is appended.
pub struct PostcodeResolver<G> {
    country: Country,
    library: Arc<PostcodeLibrary>,
    missing: SharedMissingCache,
    geocoder: G,
    selection: Box<dyn SelectionStrategy>,
    session: SessionCache,
}

impl<G: Geocoder> PostcodeResolver<G> {
    /// Create a resolver with random candidate selection.
    pub fn new(
        country: Country,
        library: Arc<PostcodeLibrary>,
        missing: SharedMissingCache,
        geocoder: G,
    ) -> Self {
        Self {
            country,
            library,
            missing,
            geocoder,
            selection: Box::new(RandomCandidate::from_entropy()),
            session: SessionCache::new(),
        }
    }

    /// Replace the candidate selection strategy.
    pub fn with_selection(mut self, selection: Box<dyn SelectionStrategy>) -> Self {
        self.selection = selection;
        self
    }

    pub fn country(&self) -> Country {
        self.country
    }

    /// Coordinates fixed so far in this session.
    pub fn session(&self) -> &SessionCache {
        &self.session
    }

    /// Resolve a raw cell value.
    ///
    /// Geocoder failures are reported as [`Resolution::LookupFailed`];
    /// only store failures (persisting a new answer) are errors.
    pub async fn resolve(&mut self, raw: &str) -> Result<Resolution, StoreError> {
        let postcode = Postcode::normalize(raw, self.country);
        if postcode.is_empty() {
            return Ok(Resolution::NotFound);
        }
        let key = postcode.as_str();

        if let Some(coordinate) = self.session.get(key) {
            return Ok(resolved(coordinate, ResolutionSource::Session));
        }

        let library = Arc::clone(&self.library);
        if let Some(candidates) = library.candidates(key)
            && let Some(coordinate) = self.session.fix(key, candidates, self.selection.as_mut())
        {
            debug!(postcode = key, "found in library");
            return Ok(resolved(coordinate, ResolutionSource::Library));
        }

        if let Some(fallback) = postcode.fallback()
            && let Some(candidates) = library.candidates(fallback)
            && let Some(coordinate) = self.session.fix(key, candidates, self.selection.as_mut())
        {
            debug!(postcode = key, fallback, "found in library (fallback)");
            return Ok(resolved(coordinate, ResolutionSource::LibraryFallback));
        }

        {
            let missing = self.missing.read().await;
            if let Some(candidates) = missing.candidates(key)
                && let Some(coordinate) =
                    self.session.fix(key, candidates, self.selection.as_mut())
            {
                debug!(postcode = key, "found in missing cache");
                return Ok(resolved(coordinate, ResolutionSource::MissingCache));
            }
        }

        let query = format!("{}, {}", key, self.country.name());
        match self.geocoder.geocode(&query).await {
            Ok(Some(coordinate)) => {
                let mut missing = self.missing.write().await;
                // Another session may have cached it while we were waiting
                if missing.candidates(key).is_some() {
                    debug!(postcode = key, %coordinate, "geocoded, already cached");
                } else {
                    missing.append(key, coordinate)?;
                    debug!(postcode = key, %coordinate, "geocoded and cached");
                }
                Ok(resolved(coordinate, ResolutionSource::Geocoder))
            }
            Ok(None) => {
                debug!(postcode = key, "not found");
                Ok(Resolution::NotFound)
            }
            Err(e) => {
                warn!(postcode = key, error = %e, "geocoding lookup failed");
                Ok(Resolution::LookupFailed(e))
            }
        }
    }
}

fn resolved(coordinate: Coordinate, source: ResolutionSource) -> Resolution {
    Resolution::Resolved { coordinate, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::StaticGeocoder;
    use crate::resolver::selection::FirstCandidate;
    use crate::store::MissingCache;
    use std::path::Path;
    use tempfile::tempdir;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn library(entries: &[(&str, Coordinate)]) -> Arc<PostcodeLibrary> {
        Arc::new(
            entries
                .iter()
                .map(|(pc, c)| (pc.to_string(), *c))
                .collect(),
        )
    }

    fn missing(path: &Path) -> SharedMissingCache {
        MissingCache::open(path).unwrap().into_shared()
    }

    fn resolver(
        country: Country,
        library: Arc<PostcodeLibrary>,
        missing: SharedMissingCache,
        geocoder: StaticGeocoder,
    ) -> PostcodeResolver<StaticGeocoder> {
        PostcodeResolver::new(country, library, missing, geocoder)
            .with_selection(Box::new(FirstCandidate))
    }

    #[tokio::test]
    async fn exact_library_hit() {
        let dir = tempdir().unwrap();
        let geocoder = StaticGeocoder::new();
        let mut r = resolver(
            Country::Australia,
            library(&[("2000", coord(-33.87, 151.21))]),
            missing(&dir.path().join("au.csv")),
            geocoder.clone(),
        );

        let resolution = r.resolve("2000").await.unwrap();
        assert_eq!(resolution.coordinate(), Some(coord(-33.87, 151.21)));
        assert!(matches!(
            resolution,
            Resolution::Resolved {
                source: ResolutionSource::Library,
                ..
            }
        ));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn falls_back_to_unpadded_library_key() {
        let dir = tempdir().unwrap();
        let darwin = coord(-12.46, 130.84);
        let mut r = resolver(
            Country::Australia,
            library(&[("800", darwin)]),
            missing(&dir.path().join("au.csv")),
            StaticGeocoder::new(),
        );

        let resolution = r.resolve("800").await.unwrap();
        assert_eq!(resolution.coordinate(), Some(darwin));
        assert!(matches!(
            resolution,
            Resolution::Resolved {
                source: ResolutionSource::LibraryFallback,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn padded_key_preferred_over_fallback() {
        let dir = tempdir().unwrap();
        let padded = coord(-12.46, 130.84);
        let unpadded = coord(-12.00, 131.00);
        let mut r = resolver(
            Country::Australia,
            library(&[("800", unpadded), ("0800", padded)]),
            missing(&dir.path().join("au.csv")),
            StaticGeocoder::new(),
        );

        assert_eq!(r.resolve("800").await.unwrap().coordinate(), Some(padded));
    }

    #[tokio::test]
    async fn session_pins_random_choice() {
        let dir = tempdir().unwrap();
        let candidates: Vec<Coordinate> =
            (0..8).map(|i| coord(-37.0 - i as f64 * 0.1, 144.9)).collect();
        let entries: Vec<(&str, Coordinate)> = candidates.iter().map(|c| ("3000", *c)).collect();

        let mut r = PostcodeResolver::new(
            Country::Australia,
            library(&entries),
            missing(&dir.path().join("au.csv")),
            StaticGeocoder::new(),
        );

        let first = r.resolve("3000").await.unwrap().coordinate().unwrap();
        assert!(candidates.contains(&first));

        for raw in ["3000", " 3000 ", "3000.0"] {
            let resolution = r.resolve(raw).await.unwrap();
            assert_eq!(resolution.coordinate(), Some(first));
            assert!(matches!(
                resolution,
                Resolution::Resolved {
                    source: ResolutionSource::Session,
                    ..
                }
            ));
        }
        assert_eq!(r.session().len(), 1);
    }

    #[tokio::test]
    async fn fallback_choice_pinned_under_normalized_key() {
        let dir = tempdir().unwrap();
        let mut r = resolver(
            Country::Australia,
            library(&[("800", coord(-12.46, 130.84))]),
            missing(&dir.path().join("au.csv")),
            StaticGeocoder::new(),
        );

        r.resolve("800").await.unwrap();
        assert_eq!(r.session().get("0800"), Some(coord(-12.46, 130.84)));
    }

    #[tokio::test]
    async fn missing_cache_hit_skips_geocoder() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("au.csv");
        std::fs::write(&path, "postcode,lat,lon\n0872,-25.34,131.03\n").unwrap();

        let geocoder = StaticGeocoder::new();
        let mut r = resolver(
            Country::Australia,
            library(&[]),
            missing(&path),
            geocoder.clone(),
        );

        let resolution = r.resolve("872").await.unwrap();
        assert_eq!(resolution.coordinate(), Some(coord(-25.34, 131.03)));
        assert!(matches!(
            resolution,
            Resolution::Resolved {
                source: ResolutionSource::MissingCache,
                ..
            }
        ));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn geocoder_answer_written_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("au.csv");
        let uluru = coord(-25.34, 131.03);
        let geocoder = StaticGeocoder::new().with_answer("0872, Australia", uluru);

        let mut r = resolver(
            Country::Australia,
            library(&[]),
            missing(&path),
            geocoder.clone(),
        );

        let resolution = r.resolve("872").await.unwrap();
        assert_eq!(resolution.coordinate(), Some(uluru));
        assert!(matches!(
            resolution,
            Resolution::Resolved {
                source: ResolutionSource::Geocoder,
                ..
            }
        ));
        assert_eq!(geocoder.calls(), 1);
        // Geocoder answers don't enter the session cache
        assert!(r.session().is_empty());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "postcode,lat,lon\n0872,-25.34,131.03\n");

        // Repeat in the same session comes from the in-memory missing cache
        let repeat = r.resolve("0872").await.unwrap();
        assert!(matches!(
            repeat,
            Resolution::Resolved {
                source: ResolutionSource::MissingCache,
                ..
            }
        ));
        assert_eq!(geocoder.calls(), 1);

        // A fresh run reads it back from disk
        let mut fresh = resolver(
            Country::Australia,
            library(&[]),
            missing(&path),
            geocoder.clone(),
        );
        let again = fresh.resolve("872").await.unwrap();
        assert_eq!(again.coordinate(), Some(uluru));
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn geocoder_query_uses_padded_postcode_and_country_name() {
        let dir = tempdir().unwrap();
        let holtsville = coord(40.81, -73.04);
        let geocoder = StaticGeocoder::new().with_answer("00501, United States", holtsville);

        let mut r = resolver(
            Country::UnitedStates,
            library(&[]),
            missing(&dir.path().join("us.csv")),
            geocoder,
        );

        assert_eq!(r.resolve("501").await.unwrap().coordinate(), Some(holtsville));
    }

    #[tokio::test]
    async fn not_found_leaves_cache_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("au.csv");
        let mut r = resolver(
            Country::Australia,
            library(&[]),
            missing(&path),
            StaticGeocoder::new(),
        );

        let resolution = r.resolve("9999").await.unwrap();
        assert!(matches!(resolution, Resolution::NotFound));
        assert_eq!(resolution.coordinate(), None);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn lookup_failure_is_distinct_from_not_found() {
        let dir = tempdir().unwrap();
        let geocoder = StaticGeocoder::new().with_failure("2000, Australia");
        let mut r = resolver(
            Country::Australia,
            library(&[]),
            missing(&dir.path().join("au.csv")),
            geocoder,
        );

        let resolution = r.resolve("2000").await.unwrap();
        assert!(matches!(resolution, Resolution::LookupFailed(_)));
        assert!(!resolution.is_resolved());
    }

    #[tokio::test]
    async fn empty_input_never_reaches_geocoder() {
        let dir = tempdir().unwrap();
        let geocoder = StaticGeocoder::new();
        let mut r = resolver(
            Country::Australia,
            library(&[]),
            missing(&dir.path().join("au.csv")),
            geocoder.clone(),
        );

        assert!(matches!(r.resolve("  ").await.unwrap(), Resolution::NotFound));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn multi_candidate_pick_is_always_a_candidate() {
        let dir = tempdir().unwrap();
        let candidates = [coord(-31.95, 115.86), coord(-32.05, 115.75), coord(-31.90, 116.0)];
        let entries: Vec<(&str, Coordinate)> = candidates.iter().map(|c| ("6000", *c)).collect();
        let library = library(&entries);
        let missing = missing(&dir.path().join("au.csv"));

        for seed in 0..50 {
            let mut r = PostcodeResolver::new(
                Country::Australia,
                Arc::clone(&library),
                Arc::clone(&missing),
                StaticGeocoder::new(),
            )
            .with_selection(Box::new(RandomCandidate::seeded(seed)));

            let pick = r.resolve("6000").await.unwrap().coordinate().unwrap();
            assert!(candidates.contains(&pick));
        }
    }

    /// Geocoder that caches the postcode from "another session" mid-lookup.
    struct RacingGeocoder {
        missing: SharedMissingCache,
        earlier: Coordinate,
        answer: Coordinate,
    }

    impl Geocoder for RacingGeocoder {
        async fn geocode(&self, _query: &str) -> Result<Option<Coordinate>, GeocodeError> {
            self.missing.write().await.append("0872", self.earlier).unwrap();
            Ok(Some(self.answer))
        }
    }

    #[tokio::test]
    async fn concurrent_geocode_is_cached_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("au.csv");
        let shared = missing(&path);
        let geocoder = RacingGeocoder {
            missing: Arc::clone(&shared),
            earlier: coord(-25.34, 131.03),
            answer: coord(-25.35, 131.04),
        };
        let mut r = PostcodeResolver::new(
            Country::Australia,
            library(&[]),
            Arc::clone(&shared),
            geocoder,
        );

        let resolution = r.resolve("872").await.unwrap();
        assert_eq!(resolution.coordinate(), Some(coord(-25.35, 131.04)));

        assert_eq!(
            shared.read().await.candidates("0872"),
            Some(&[coord(-25.34, 131.03)][..])
        );
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "postcode,lat,lon\n0872,-25.34,131.03\n"
        );
    }
}
