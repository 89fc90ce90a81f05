//! Enumeration types for the Harvest simulation.
//!
//! Classification enums carry their own fixed thresholds so every consumer
//! (synthetic generator, genuine source decoders, the farm engine) derives
//! labels the same way.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Seasons
// ---------------------------------------------------------------------------

/// Season of the in-game year, derived from the day counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Season {
    /// First quarter of the year.
    Spring,
    /// Second quarter of the year.
    Summer,
    /// Third quarter of the year.
    Fall,
    /// Fourth quarter of the year.
    Winter,
}

impl Season {
    /// The annual cycle in order.
    pub const CYCLE: [Self; 4] = [Self::Spring, Self::Summer, Self::Fall, Self::Winter];

    /// Map a cycle index onto a season. Indices wrap every four seasons.
    pub const fn from_cycle_index(index: u64) -> Self {
        match index % 4 {
            0 => Self::Spring,
            1 => Self::Summer,
            2 => Self::Fall,
            _ => Self::Winter,
        }
    }
}

// ---------------------------------------------------------------------------
// Growth stages
// ---------------------------------------------------------------------------

/// Life-cycle position of a crop on a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum GrowthStage {
    /// No crop planted.
    Empty,
    /// Progress below 0.25.
    Seedling,
    /// Progress in `[0.25, 0.5)`.
    Vegetative,
    /// Progress in `[0.5, 0.75)`.
    Flowering,
    /// Progress in `[0.75, 1.0)`.
    Fruiting,
    /// Progress of 1.0; ready for harvest.
    Mature,
}

impl GrowthStage {
    /// Upper bound (exclusive) of the seedling stage.
    pub const SEEDLING_LIMIT: f64 = 0.25;
    /// Upper bound (exclusive) of the vegetative stage.
    pub const VEGETATIVE_LIMIT: f64 = 0.5;
    /// Upper bound (exclusive) of the flowering stage.
    pub const FLOWERING_LIMIT: f64 = 0.75;
    /// Upper bound (exclusive) of the fruiting stage.
    pub const FRUITING_LIMIT: f64 = 1.0;

    /// Stage of a planted crop at the given growth progress.
    ///
    /// This is a pure function: the same progress always yields the same
    /// stage. A NaN progress is treated as freshly planted.
    pub fn from_progress(progress: f64) -> Self {
        if progress.is_nan() || progress < Self::SEEDLING_LIMIT {
            Self::Seedling
        } else if progress < Self::VEGETATIVE_LIMIT {
            Self::Vegetative
        } else if progress < Self::FLOWERING_LIMIT {
            Self::Flowering
        } else if progress < Self::FRUITING_LIMIT {
            Self::Fruiting
        } else {
            Self::Mature
        }
    }
}

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Where a piece of environmental data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Provenance {
    /// Fetched from an external source.
    Genuine,
    /// Produced locally by the synthetic fallback generator.
    Synthetic,
}

impl Provenance {
    /// Whether the data came from an external source.
    pub const fn is_genuine(self) -> bool {
        matches!(self, Self::Genuine)
    }
}

/// The four environmental data domains the aggregator fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum EnvironmentDomain {
    /// Air temperature, humidity, wind, pressure, cloud, solar radiation.
    Weather,
    /// Soil moisture, temperature, chemistry, fertility.
    Soil,
    /// Vegetation indices (NDVI, EVI, LAI).
    Vegetation,
    /// Rainfall totals.
    Precipitation,
}

impl core::fmt::Display for EnvironmentDomain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Weather => "weather",
            Self::Soil => "soil",
            Self::Vegetation => "vegetation",
            Self::Precipitation => "precipitation",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Classifications
// ---------------------------------------------------------------------------

/// Vegetation health label derived from NDVI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum VegetationHealth {
    /// NDVI below 0.3.
    Poor,
    /// NDVI in `[0.3, 0.5)`.
    Fair,
    /// NDVI in `[0.5, 0.7)`.
    Good,
    /// NDVI of 0.7 or above.
    Excellent,
}

impl VegetationHealth {
    /// Classify an NDVI value.
    pub fn from_ndvi(ndvi: f64) -> Self {
        if ndvi < 0.3 {
            Self::Poor
        } else if ndvi < 0.5 {
            Self::Fair
        } else if ndvi < 0.7 {
            Self::Good
        } else {
            Self::Excellent
        }
    }
}

/// Precipitation class derived from the daily total in mm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PrecipitationKind {
    /// Exactly zero mm/day.
    NoPrecipitation,
    /// Above 0 and below 2 mm/day.
    Drizzle,
    /// From 2 up to 10 mm/day.
    LightRain,
    /// 10 mm/day or more.
    HeavyRain,
}

impl PrecipitationKind {
    /// Classify a daily precipitation total in mm.
    pub fn from_daily_mm(mm: f64) -> Self {
        if mm <= 0.0 || mm.is_nan() {
            Self::NoPrecipitation
        } else if mm < 2.0 {
            Self::Drizzle
        } else if mm < 10.0 {
            Self::LightRain
        } else {
            Self::HeavyRain
        }
    }
}

/// Coarse climate band used by the synthetic generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ClimateBand {
    /// Absolute latitude below 30 degrees.
    Tropical,
    /// Absolute latitude from 30 up to 60 degrees.
    Temperate,
    /// Absolute latitude of 60 degrees or more.
    Polar,
}

impl ClimateBand {
    /// Band for a latitude in degrees (either hemisphere).
    pub fn from_latitude(lat: f64) -> Self {
        let abs = lat.abs();
        if abs < 30.0 {
            Self::Tropical
        } else if abs < 60.0 {
            Self::Temperate
        } else {
            Self::Polar
        }
    }
}
