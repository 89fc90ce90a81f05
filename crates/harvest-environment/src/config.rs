//! Configuration for the environment aggregator and its external sources.
//!
//! These structs are embedded in the top-level `harvest-config.yaml`
//! (sections `environment` and `sources`). Every field has a default so a
//! missing section yields a working, if offline-leaning, setup.

use std::time::Duration;

use serde::Deserialize;

/// Aggregator behaviour: caching, timeouts, and synthetic seeding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AggregatorConfig {
    /// How long a cached snapshot stays fresh, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Per-domain fetch deadline, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Decimal places kept when rounding coordinates into a cache key.
    #[serde(default = "default_key_precision")]
    pub key_precision: u32,

    /// Seed for the synthetic generator.
    #[serde(default = "default_synthetic_seed")]
    pub synthetic_seed: u64,

    /// Skip external sources entirely and always synthesize.
    #[serde(default)]
    pub offline: bool,
}

impl AggregatorConfig {
    /// Cache freshness window.
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Per-domain fetch deadline.
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            key_precision: default_key_precision(),
            synthetic_seed: default_synthetic_seed(),
            offline: false,
        }
    }
}

/// Endpoints and credentials for the genuine sources.
///
/// A domain whose credentials are missing reports itself as not configured
/// and is synthesized without a network round trip.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourcesConfig {
    /// `OpenWeatherMap` base URL.
    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    /// `OpenWeatherMap` API key.
    #[serde(default)]
    pub weather_api_key: Option<String>,

    /// Open-Meteo base URL for soil conditions.
    #[serde(default = "default_open_meteo_url")]
    pub soil_url: String,

    /// `AppEEARS` point-sample base URL for vegetation indices.
    #[serde(default = "default_vegetation_url")]
    pub vegetation_url: String,

    /// `Earthdata` bearer token for the vegetation source.
    #[serde(default)]
    pub vegetation_token: Option<String>,

    /// Open-Meteo base URL for precipitation history.
    #[serde(default = "default_open_meteo_url")]
    pub precipitation_url: String,

    /// Nominatim-compatible reverse-geocoding base URL. When absent, places
    /// are named by the coarse region-band heuristic.
    #[serde(default)]
    pub geocoding_url: Option<String>,

    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl SourcesConfig {
    /// Apply environment-variable overrides for secrets and endpoints.
    ///
    /// - `OPENWEATHER_API_KEY` overrides `weather_api_key`
    /// - `NASA_BEARER_TOKEN` overrides `vegetation_token`
    /// - `HARVEST_GEOCODING_URL` overrides `geocoding_url`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OPENWEATHER_API_KEY") {
            self.weather_api_key = Some(key);
        }
        if let Ok(token) = std::env::var("NASA_BEARER_TOKEN") {
            self.vegetation_token = Some(token);
        }
        if let Ok(url) = std::env::var("HARVEST_GEOCODING_URL") {
            self.geocoding_url = Some(url);
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            weather_url: default_weather_url(),
            weather_api_key: None,
            soil_url: default_open_meteo_url(),
            vegetation_url: default_vegetation_url(),
            vegetation_token: None,
            precipitation_url: default_open_meteo_url(),
            geocoding_url: None,
            user_agent: default_user_agent(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_cache_ttl_secs() -> u64 {
    1_800
}

const fn default_fetch_timeout_ms() -> u64 {
    5_000
}

const fn default_key_precision() -> u32 {
    2
}

const fn default_synthetic_seed() -> u64 {
    0x5eed_f00d
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org".to_owned()
}

fn default_open_meteo_url() -> String {
    "https://api.open-meteo.com".to_owned()
}

fn default_vegetation_url() -> String {
    "https://appeears.earthdatacloud.nasa.gov/api/v1".to_owned()
}

fn default_user_agent() -> String {
    concat!("harvest-engine/", env!("CARGO_PKG_VERSION")).to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AggregatorConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(1800));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(config.key_precision, 2);
        assert!(!config.offline);
    }

    #[test]
    fn partial_sources_section_fills_defaults() {
        let config: SourcesConfig =
            serde_json::from_str(r#"{"weather_api_key": "abc"}"#).unwrap();
        assert_eq!(config.weather_api_key.as_deref(), Some("abc"));
        assert_eq!(config.soil_url, "https://api.open-meteo.com");
        assert!(config.geocoding_url.is_none());
        assert!(config.user_agent.starts_with("harvest-engine/"));
    }
}
