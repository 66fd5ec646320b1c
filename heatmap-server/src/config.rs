//! Server configuration from environment variables.

use std::net::SocketAddr;

use tracing::warn;

use crate::geocode::NominatimConfig;
use crate::resolver::SelectionMode;
use crate::store::StoreConfig;

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Error for an environment variable with an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    var: &'static str,
    value: String,
    reason: String,
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub nominatim: NominatimConfig,
    pub selection: SelectionMode,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// | Variable                 | Default                  |
    /// |--------------------------|--------------------------|
    /// | `HEATMAP_BIND_ADDR`      | `127.0.0.1:3000`         |
    /// | `HEATMAP_DATA_DIR`       | `data`                   |
    /// | `HEATMAP_SELECTION`      | `random` (or `first`)    |
    /// | `HEATMAP_SEED`           | unset (OS entropy)       |
    /// | `NOMINATIM_BASE_URL`     | public Nominatim         |
    /// | `NOMINATIM_USER_AGENT`   | `postcode_heatmap`       |
    /// | `NOMINATIM_TIMEOUT_SECS` | `30`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr =
            lookup("HEATMAP_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError {
                var: "HEATMAP_BIND_ADDR",
                value: bind_addr.clone(),
                reason: e.to_string(),
            })?;

        let store = match lookup("HEATMAP_DATA_DIR") {
            Some(dir) => StoreConfig::new(dir),
            None => StoreConfig::default(),
        };

        let mut nominatim = NominatimConfig::new();
        if let Some(url) = lookup("NOMINATIM_BASE_URL") {
            nominatim = nominatim.with_base_url(url);
        }
        if let Some(agent) = lookup("NOMINATIM_USER_AGENT") {
            nominatim = nominatim.with_user_agent(agent);
        }
        if let Some(secs) = lookup("NOMINATIM_TIMEOUT_SECS") {
            let parsed: u64 = secs.parse().map_err(|e: std::num::ParseIntError| ConfigError {
                var: "NOMINATIM_TIMEOUT_SECS",
                value: secs.clone(),
                reason: e.to_string(),
            })?;
            nominatim = nominatim.with_timeout(parsed);
        }

        let seed = lookup("HEATMAP_SEED")
            .map(|seed| {
                seed.parse::<u64>().map_err(|e| ConfigError {
                    var: "HEATMAP_SEED",
                    value: seed.clone(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let selection = match lookup("HEATMAP_SELECTION").as_deref() {
            None | Some("random") => match seed {
                Some(seed) => SelectionMode::Seeded(seed),
                None => SelectionMode::Random,
            },
            Some("first") => {
                if seed.is_some() {
                    warn!("HEATMAP_SEED is ignored with HEATMAP_SELECTION=first");
                }
                SelectionMode::First
            }
            Some(other) => {
                return Err(ConfigError {
                    var: "HEATMAP_SELECTION",
                    value: other.to_string(),
                    reason: "expected \"random\" or \"first\"".to_string(),
                });
            }
        };

        Ok(Self {
            bind_addr,
            store,
            nominatim,
            selection,
        })
    }
}
