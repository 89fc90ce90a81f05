//! Environmental records and the aggregated snapshot.
//!
//! Each domain record has the same shape whether it was fetched from an
//! external source or produced by the synthetic generator. Provenance is
//! tracked per domain on the [`EnvironmentalSnapshot`], not inside the
//! records, so a record can be built before its origin is known.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EnvironmentDomain, PrecipitationKind, Provenance, VegetationHealth};

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinates {
    /// Latitude, positive north.
    pub lat: f64,
    /// Longitude, positive east.
    pub lon: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether the coordinate lies in the southern hemisphere.
    pub fn is_southern(&self) -> bool {
        self.lat < 0.0
    }
}

// ---------------------------------------------------------------------------
// Domain records
// ---------------------------------------------------------------------------

/// Surface weather conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WeatherRecord {
    /// Air temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Wind speed in km/h.
    pub wind_speed: f64,
    /// Sea-level pressure in hPa.
    pub pressure: f64,
    /// Cloud cover in percent (0-100).
    pub cloud_cover: f64,
    /// Estimated solar radiation in W/m².
    pub solar_radiation: f64,
    /// Human-readable description of where the record came from.
    pub source: String,
}

/// Soil conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SoilRecord {
    /// Volumetric surface moisture fraction (0-10 cm).
    pub surface_moisture: f64,
    /// Volumetric root-zone moisture fraction.
    pub root_zone_moisture: f64,
    /// Soil temperature in degrees Celsius.
    pub soil_temperature: f64,
    /// Organic matter in percent.
    pub organic_matter: f64,
    /// Soil pH.
    pub ph: f64,
    /// Salinity in dS/m.
    pub salinity: f64,
    /// Fertility index in `[0, 1]`.
    pub fertility: f64,
    /// Human-readable description of where the record came from.
    pub source: String,
    /// Spatial resolution of the underlying product.
    pub resolution: String,
}

/// Vegetation indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct VegetationRecord {
    /// Normalized difference vegetation index.
    pub ndvi: f64,
    /// Enhanced vegetation index.
    pub evi: f64,
    /// Leaf area index.
    pub lai: f64,
    /// Health label derived from NDVI.
    pub health: VegetationHealth,
    /// Human-readable description of where the record came from.
    pub source: String,
    /// Spatial resolution of the underlying product.
    pub resolution: String,
}

/// Rainfall totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PrecipitationRecord {
    /// Precipitation over the last day in mm.
    pub daily: f64,
    /// Precipitation over the last seven days in mm.
    pub weekly_total: f64,
    /// Precipitation over the last thirty days in mm.
    pub monthly_total: f64,
    /// Class of the daily total.
    pub kind: PrecipitationKind,
    /// Human-readable description of where the record came from.
    pub source: String,
    /// Spatial resolution of the underlying product.
    pub resolution: String,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Provenance tag for each of the four domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProvenanceTags {
    /// Origin of the weather record.
    pub weather: Provenance,
    /// Origin of the soil record.
    pub soil: Provenance,
    /// Origin of the vegetation record.
    pub vegetation: Provenance,
    /// Origin of the precipitation record.
    pub precipitation: Provenance,
}

impl ProvenanceTags {
    /// Tags with every domain synthetic.
    pub const ALL_SYNTHETIC: Self = Self {
        weather: Provenance::Synthetic,
        soil: Provenance::Synthetic,
        vegetation: Provenance::Synthetic,
        precipitation: Provenance::Synthetic,
    };

    /// Look up the tag for one domain.
    pub const fn get(self, domain: EnvironmentDomain) -> Provenance {
        match domain {
            EnvironmentDomain::Weather => self.weather,
            EnvironmentDomain::Soil => self.soil,
            EnvironmentDomain::Vegetation => self.vegetation,
            EnvironmentDomain::Precipitation => self.precipitation,
        }
    }

    /// Number of domains that came from an external source.
    pub fn genuine_count(self) -> usize {
        [self.weather, self.soil, self.vegetation, self.precipitation]
            .iter()
            .filter(|p| p.is_genuine())
            .count()
    }
}

/// A human-readable place name for a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResolvedLocation {
    /// Display name (reverse-geocoded or coarse region band).
    pub name: String,
    /// Whether the name came from a geocoding source or the local heuristic.
    pub provenance: Provenance,
}

/// An immutable aggregated environmental record for one coordinate and
/// capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct EnvironmentalSnapshot {
    /// Weather domain.
    pub weather: WeatherRecord,
    /// Soil domain.
    pub soil: SoilRecord,
    /// Vegetation domain.
    pub vegetation: VegetationRecord,
    /// Precipitation domain.
    pub precipitation: PrecipitationRecord,
    /// Coordinate the snapshot was requested for.
    pub coordinates: Coordinates,
    /// Resolved place name.
    pub location: ResolvedLocation,
    /// When the snapshot was assembled.
    pub captured_at: DateTime<Utc>,
    /// Per-domain origin of the data.
    pub provenance: ProvenanceTags,
}
