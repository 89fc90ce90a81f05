//! Configuration loading and typed config structures for the Harvest engine.
//!
//! The canonical configuration lives in `harvest-config.yaml` at the project
//! root. Every section and field has a default, so an empty file is a
//! valid configuration. After parsing, environment variables override
//! secrets and a few deployment knobs, then the result is validated.

use std::path::Path;

use harvest_environment::{AggregatorConfig, SourcesConfig};
use harvest_types::Crop;
use serde::Deserialize;

use crate::catalog::{CropCatalog, LocationCatalog};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `harvest-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HarvestConfig {
    /// Game rules and timing.
    #[serde(default)]
    pub game: GameConfig,

    /// Environment aggregator behaviour.
    #[serde(default)]
    pub environment: AggregatorConfig,

    /// External environmental data sources.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Logging output.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Replacement crop table. When absent the built-in catalog is used.
    #[serde(default)]
    pub crops: Option<Vec<Crop>>,
}

impl HarvestConfig {
    /// Load, override from the environment, and validate a YAML file.
    ///
    /// Environment variables applied after parsing:
    /// - `HARVEST_FARM_LOCATION` overrides `game.farm_location`
    /// - `HARVEST_TICK_INTERVAL_MS` overrides `game.tick_interval_ms`
    /// - `OPENWEATHER_API_KEY`, `NASA_BEARER_TOKEN`, `HARVEST_GEOCODING_URL`
    ///   override the matching `sources` fields
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse, override from the environment, and validate a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] or [`ConfigError::Invalid`].
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.sources.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply game overrides from a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `HARVEST_TICK_INTERVAL_MS` is
    /// not an unsigned integer.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(location) = lookup("HARVEST_FARM_LOCATION") {
            self.game.farm_location = location;
        }
        if let Some(raw) = lookup("HARVEST_TICK_INTERVAL_MS") {
            self.game.tick_interval_ms =
                raw.trim().parse().map_err(|_err| ConfigError::Invalid {
                    reason: format!("HARVEST_TICK_INTERVAL_MS is not an integer: {raw:?}"),
                })?;
        }
        Ok(())
    }

    /// Check that the configuration describes a runnable game.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| {
            Err(ConfigError::Invalid {
                reason: reason.to_owned(),
            })
        };

        if self.game.tick_interval_ms == 0 {
            return invalid("game.tick_interval_ms must be greater than 0");
        }
        if self.game.days_per_season == 0 {
            return invalid("game.days_per_season must be greater than 0");
        }
        if self.game.plot_count == 0 {
            return invalid("game.plot_count must be greater than 0");
        }
        if self.environment.fetch_timeout_ms == 0 {
            return invalid("environment.fetch_timeout_ms must be greater than 0");
        }
        if LocationCatalog::builtin().get(&self.game.farm_location).is_none() {
            return Err(ConfigError::Invalid {
                reason: format!("unknown farm location {:?}", self.game.farm_location),
            });
        }

        if let Some(crops) = &self.crops {
            if crops.is_empty() {
                return invalid("crops override must list at least one crop");
            }
            if let Some(crop) = crops.iter().find(|c| c.growth_time == 0) {
                return Err(ConfigError::Invalid {
                    reason: format!("crop {:?} has a growth time of 0", crop.id),
                });
            }
        }
        Ok(())
    }

    /// The crop catalog: the override list if configured, else built-in.
    pub fn crop_catalog(&self) -> CropCatalog {
        self.crops
            .clone()
            .map_or_else(CropCatalog::builtin, CropCatalog::from_crops)
    }
}

/// Game rules and timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Location catalog id of the farm.
    #[serde(default = "default_farm_location")]
    pub farm_location: String,

    /// Wall-clock milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// In-game days per season.
    #[serde(default = "default_days_per_season")]
    pub days_per_season: u32,

    /// Number of plots created at farm initialization.
    #[serde(default = "default_plot_count")]
    pub plot_count: usize,

    /// Starting budget.
    #[serde(default = "default_initial_budget")]
    pub initial_budget: i64,

    /// Starting sustainability score.
    #[serde(default = "default_initial_sustainability")]
    pub initial_sustainability: i64,

    /// Farm archetype label.
    #[serde(default = "default_farm_type")]
    pub farm_type: String,

    /// Seed for initial plot soil. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            farm_location: default_farm_location(),
            tick_interval_ms: default_tick_interval_ms(),
            days_per_season: default_days_per_season(),
            plot_count: default_plot_count(),
            initial_budget: default_initial_budget(),
            initial_sustainability: default_initial_sustainability(),
            farm_type: default_farm_type(),
            seed: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_farm_location() -> String {
    "iowa".to_owned()
}

const fn default_tick_interval_ms() -> u64 {
    10_000
}

const fn default_days_per_season() -> u32 {
    90
}

const fn default_plot_count() -> usize {
    16
}

const fn default_initial_budget() -> i64 {
    10_000
}

const fn default_initial_sustainability() -> i64 {
    50
}

fn default_farm_type() -> String {
    "smallholder".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
