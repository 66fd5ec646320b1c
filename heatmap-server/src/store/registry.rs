//! Per-country store registry for long-running processes.
//!
//! Libraries are loaded the first time a country is requested and kept
//! for the lifetime of the process. Missing caches are opened once per
//! country and shared, so writers inside one process are serialized
//! through the cache's lock.

use std::path::PathBuf;
use std::sync::Arc;

use moka::future::Cache as MokaCache;

use crate::domain::Country;

use super::error::StoreError;
use super::library::PostcodeLibrary;
use super::missing::{MissingCache, SharedMissingCache};

/// Default directory holding the library and missing-cache files.
const DEFAULT_DATA_DIR: &str = "data";

/// Where the per-country store files live.
///
/// Layout: `{data_dir}/library/{key}.csv` and `{data_dir}/missing/{key}.csv`,
/// where `key` is the lower-case country code.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the library file for a country.
    pub fn library_path(&self, country: Country) -> PathBuf {
        self.data_dir
            .join("library")
            .join(format!("{}.csv", country.file_key()))
    }

    /// Path of the missing-cache file for a country.
    pub fn missing_path(&self, country: Country) -> PathBuf {
        self.data_dir
            .join("missing")
            .join(format!("{}.csv", country.file_key()))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

/// Lazily loaded stores, keyed by country.
pub struct StoreRegistry {
    config: StoreConfig,
    libraries: MokaCache<Country, Arc<PostcodeLibrary>>,
    missing: MokaCache<Country, SharedMissingCache>,
}

impl StoreRegistry {
    /// Create a registry over the given data directory layout.
    pub fn new(config: StoreConfig) -> Self {
        // One entry per supported country; nothing ever expires
        let capacity = Country::ALL.len() as u64;
        Self {
            config,
            libraries: MokaCache::builder().max_capacity(capacity).build(),
            missing: MokaCache::builder().max_capacity(capacity).build(),
        }
    }

    /// The library for a country, loading it on first use.
    pub async fn library(&self, country: Country) -> Result<Arc<PostcodeLibrary>, StoreError> {
        let path = self.config.library_path(country);
        self.libraries
            .try_get_with(country, async move { PostcodeLibrary::load(path).map(Arc::new) })
            .await
            .map_err(StoreError::Shared)
    }

    /// The shared missing cache for a country, opening it on first use.
    pub async fn missing_cache(&self, country: Country) -> Result<SharedMissingCache, StoreError> {
        let path = self.config.missing_path(country);
        self.missing
            .try_get_with(country, async move {
                MissingCache::open(path).map(MissingCache::into_shared)
            })
            .await
            .map_err(StoreError::Shared)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;
    use tempfile::tempdir;

    #[test]
    fn store_paths() {
        let config = StoreConfig::new("/srv/heatmap");
        assert_eq!(
            config.library_path(Country::Australia),
            PathBuf::from("/srv/heatmap/library/au.csv")
        );
        assert_eq!(
            config.missing_path(Country::UnitedStates),
            PathBuf::from("/srv/heatmap/missing/us.csv")
        );
    }

    #[test]
    fn default_data_dir() {
        assert_eq!(StoreConfig::default().data_dir, PathBuf::from("data"));
    }

    #[tokio::test]
    async fn library_loaded_once_per_country() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path());
        std::fs::create_dir_all(dir.path().join("library")).unwrap();
        std::fs::write(
            config.library_path(Country::Australia),
            "postcode,lat,lon\n2000,-33.87,151.21\n",
        )
        .unwrap();

        let registry = StoreRegistry::new(config.clone());
        let first = registry.library(Country::Australia).await.unwrap();

        // Later edits to the file are not observed
        std::fs::write(config.library_path(Country::Australia), "postcode,lat,lon\n").unwrap();
        let second = registry.library(Country::Australia).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn malformed_library_is_an_error() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path());
        std::fs::create_dir_all(dir.path().join("library")).unwrap();
        std::fs::write(
            config.library_path(Country::NewZealand),
            "postcode,lat,lon\n0600,oops,174.7\n",
        )
        .unwrap();

        let registry = StoreRegistry::new(config);
        let err = registry.library(Country::NewZealand).await.unwrap_err();
        assert!(err.to_string().contains("malformed CSV"));
    }

    #[tokio::test]
    async fn missing_cache_is_shared() {
        let dir = tempdir().unwrap();
        let registry = StoreRegistry::new(StoreConfig::new(dir.path()));

        let a = registry.missing_cache(Country::Canada).await.unwrap();
        let b = registry.missing_cache(Country::Canada).await.unwrap();

        a.write()
            .await
            .append("K1A 0B1", Coordinate::new(45.42, -75.70).unwrap())
            .unwrap();

        assert!(b.read().await.candidates("K1A 0B1").is_some());
    }
}
