//! Deterministic synthetic environment generator.
//!
//! Produces believable weather, soil, vegetation, and precipitation records
//! from a coordinate and wall-clock time without touching the network. The
//! output is a gameplay substitute, not a scientific model.
//!
//! # Model
//!
//! - A seasonal factor in `[-1, 1]` is a sinusoid on day-of-year, phase
//!   shifted by hemisphere (~80 days north, ~260 days south) so both
//!   hemispheres peak in their own summer.
//! - Temperature adds a diurnal sinusoid peaking mid-afternoon, subtracts a
//!   latitude-proportional cooling term, and adds bounded jitter.
//! - Soil, vegetation, and precipitation baselines come from the
//!   [`ClimateBand`] of the latitude, perturbed by the seasonal factor.
//! - A single "wetness" draw is shared by cloud cover, humidity, soil
//!   moisture, and rainfall so the four records agree with each other.
//! - Solar radiation is derived from the cloud cover, never drawn.
//!
//! # Determinism
//!
//! The RNG is seeded from `(seed, lat, lon, hour-of-epoch)`. Repeated calls
//! for the same place within the same hour produce identical records.

use std::f64::consts::TAU;

use chrono::{DateTime, Datelike, Timelike, Utc};
use harvest_types::{
    ClimateBand, Coordinates, PrecipitationKind, PrecipitationRecord, SoilRecord,
    VegetationHealth, VegetationRecord, WeatherRecord,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::solar;

/// Day-of-year phase offset for the northern hemisphere.
const NORTHERN_PHASE_OFFSET: f64 = 80.0;

/// Day-of-year phase offset for the southern hemisphere.
const SOUTHERN_PHASE_OFFSET: f64 = 260.0;

/// Inclusive bounds for synthetic surface soil moisture.
pub const SOIL_MOISTURE_BOUNDS: (f64, f64) = (0.1, 0.8);

/// Inclusive bounds for synthetic soil fertility.
pub const FERTILITY_BOUNDS: (f64, f64) = (0.2, 1.0);

/// Inclusive bounds for synthetic NDVI.
pub const NDVI_BOUNDS: (f64, f64) = (0.1, 0.9);

/// One full set of synthetic domain records for a coordinate and time.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticEnvironment {
    /// Synthetic weather.
    pub weather: WeatherRecord,
    /// Synthetic soil.
    pub soil: SoilRecord,
    /// Synthetic vegetation.
    pub vegetation: VegetationRecord,
    /// Synthetic precipitation.
    pub precipitation: PrecipitationRecord,
}

/// Inputs shared by every domain model for one generation call.
#[derive(Debug, Clone, Copy)]
struct Conditions {
    at: Coordinates,
    day_of_year: u32,
    hour: f64,
    band: ClimateBand,
    season: f64,
    wetness: f64,
}

/// Offline environment model seeded for reproducibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticGenerator {
    seed: u64,
}

impl SyntheticGenerator {
    /// Create a generator with the given seed.
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Return the generator seed.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate all four domain records for a coordinate at `now`.
    pub fn generate(&self, at: Coordinates, now: DateTime<Utc>) -> SyntheticEnvironment {
        let mut rng = StdRng::seed_from_u64(self.seed_for(at, now));

        let day_of_year = now.ordinal();
        let conditions = Conditions {
            at,
            day_of_year,
            hour: f64::from(now.hour()) + f64::from(now.minute()) / 60.0,
            band: ClimateBand::from_latitude(at.lat),
            season: seasonal_factor(at.lat, day_of_year),
            wetness: rng.random(),
        };

        let weather = weather(&mut rng, &conditions);
        let soil = soil(&mut rng, &conditions, weather.temperature);
        let vegetation = vegetation(&mut rng, &conditions);
        let precipitation = precipitation(&mut rng, &conditions);

        SyntheticEnvironment {
            weather,
            soil,
            vegetation,
            precipitation,
        }
    }

    /// Derive the per-call RNG seed from the coordinate and hour of epoch.
    fn seed_for(&self, at: Coordinates, now: DateTime<Utc>) -> u64 {
        let hour_of_epoch = u64::from_le_bytes(now.timestamp().div_euclid(3600).to_le_bytes());
        let mut state = mix(self.seed, at.lat.to_bits());
        state = mix(state, at.lon.to_bits());
        mix(state, hour_of_epoch)
    }
}

/// Seasonal factor in `[-1, 1]`; `1` at local midsummer.
pub fn seasonal_factor(lat: f64, day_of_year: u32) -> f64 {
    let offset = if lat < 0.0 {
        SOUTHERN_PHASE_OFFSET
    } else {
        NORTHERN_PHASE_OFFSET
    };
    (TAU * (f64::from(day_of_year) - offset) / 365.0).sin()
}

/// Typical soil fertility for a climate band.
pub(crate) const fn baseline_fertility(band: ClimateBand) -> f64 {
    match band {
        ClimateBand::Tropical => 0.6,
        ClimateBand::Temperate => 0.75,
        ClimateBand::Polar => 0.4,
    }
}

/// Typical organic matter percentage for a climate band.
pub(crate) const fn baseline_organic_matter(band: ClimateBand) -> f64 {
    match band {
        ClimateBand::Tropical => 2.5,
        ClimateBand::Temperate => 4.0,
        ClimateBand::Polar => 6.0,
    }
}

/// Combine `value` into `state` with one `xorshift64` round.
const fn mix(state: u64, value: u64) -> u64 {
    let mut next = state ^ value.wrapping_mul(0x517c_c1b7_2722_0a95);

    // xorshift requires non-zero input.
    if next == 0 {
        next = 0xdead_beef_cafe_babe;
    }

    next ^= next << 13;
    next ^= next >> 7;
    next ^= next << 17;
    next
}

/// Round to one decimal place for display.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Domain models
// ---------------------------------------------------------------------------

fn weather(rng: &mut StdRng, c: &Conditions) -> WeatherRecord {
    let abs_lat = c.at.lat.abs();
    let amplitude = (3.0 + 0.25 * abs_lat).min(15.0);
    let diurnal = 5.0 * (TAU * (c.hour - 9.0) / 24.0).sin();
    let cooling = 0.4 * abs_lat;
    let jitter = rng.random_range(-3.0..3.0);
    let temperature = 27.0 + amplitude * c.season + diurnal - cooling + jitter;

    let humidity_base = match c.band {
        ClimateBand::Tropical => 75.0,
        ClimateBand::Temperate => 60.0,
        ClimateBand::Polar => 70.0,
    };
    let humidity = (humidity_base + 40.0 * (c.wetness - 0.5) + rng.random_range(-5.0..5.0))
        .clamp(10.0, 100.0);

    let polar_gusts = if c.band == ClimateBand::Polar { 5.0 } else { 0.0 };
    let wind_speed = 5.0 + rng.random_range(0.0..15.0) + polar_gusts;
    let pressure = 1013.0 + 20.0 * (0.5 - c.wetness) + rng.random_range(-10.0..10.0);
    let cloud_cover =
        (100.0 * (0.1 + 0.8 * c.wetness) + rng.random_range(-10.0..10.0)).clamp(0.0, 100.0).round();

    WeatherRecord {
        temperature: round1(temperature),
        humidity: round1(humidity),
        wind_speed: round1(wind_speed),
        pressure: round1(pressure),
        cloud_cover,
        solar_radiation: round1(solar::solar_radiation(c.at.lat, c.day_of_year, cloud_cover)),
        source: "Synthetic (weather source unavailable)".to_owned(),
    }
}

fn soil(rng: &mut StdRng, c: &Conditions, air_temperature: f64) -> SoilRecord {
    let moisture_base = match c.band {
        ClimateBand::Tropical => 0.5,
        ClimateBand::Temperate => 0.4,
        ClimateBand::Polar => 0.3,
    };
    let (min_moisture, max_moisture) = SOIL_MOISTURE_BOUNDS;
    let surface_moisture = (moisture_base
        + 0.1 * c.season
        + 0.2 * (c.wetness - 0.5)
        + rng.random_range(-0.05..0.05))
    .clamp(min_moisture, max_moisture);

    let (min_fertility, max_fertility) = FERTILITY_BOUNDS;
    let fertility = (baseline_fertility(c.band) + 0.05 * c.season + rng.random_range(-0.1..0.1))
        .clamp(min_fertility, max_fertility);

    let organic_matter =
        (baseline_organic_matter(c.band) + rng.random_range(-1.0..1.0)).clamp(0.5, 10.0);

    SoilRecord {
        surface_moisture,
        root_zone_moisture: surface_moisture * 0.8,
        soil_temperature: round1(air_temperature - 2.0 + rng.random_range(-1.0..1.0)),
        organic_matter: round1(organic_matter),
        ph: round1(6.0 + rng.random_range(0.0..2.0)),
        salinity: round1(rng.random_range(0.0..4.0)),
        fertility,
        source: "Synthetic (soil source unavailable)".to_owned(),
        resolution: "36km".to_owned(),
    }
}

fn vegetation(rng: &mut StdRng, c: &Conditions) -> VegetationRecord {
    let (base, amplitude) = match c.band {
        ClimateBand::Tropical => (0.65, 0.05),
        ClimateBand::Temperate => (0.5, 0.3),
        ClimateBand::Polar => (0.3, 0.2),
    };
    let (min_ndvi, max_ndvi) = NDVI_BOUNDS;
    let ndvi =
        (base + amplitude * c.season + rng.random_range(-0.1..0.1)).clamp(min_ndvi, max_ndvi);

    VegetationRecord {
        ndvi,
        evi: 0.8 * ndvi,
        lai: 6.0 * ndvi,
        health: VegetationHealth::from_ndvi(ndvi),
        source: "Synthetic (vegetation source unavailable)".to_owned(),
        resolution: "250m".to_owned(),
    }
}

fn precipitation(rng: &mut StdRng, c: &Conditions) -> PrecipitationRecord {
    let abs_lat = c.at.lat.abs();
    let base = if abs_lat < 10.0 {
        8.0
    } else if abs_lat < 30.0 {
        5.0
    } else if abs_lat < 60.0 {
        3.0
    } else {
        1.0
    };
    let daily = round1(
        (base * (1.0 + 0.4 * c.season)
            + base * 1.5 * (c.wetness - 0.5)
            + rng.random_range(-1.0..1.0))
        .max(0.0),
    );

    PrecipitationRecord {
        daily,
        weekly_total: round1(daily * 7.0 * rng.random_range(0.8..1.2)),
        monthly_total: round1(daily * 30.0 * rng.random_range(0.7..1.3)),
        kind: PrecipitationKind::from_daily_mm(daily),
        source: "Synthetic (precipitation source unavailable)".to_owned(),
        resolution: "10km".to_owned(),
    }
}
