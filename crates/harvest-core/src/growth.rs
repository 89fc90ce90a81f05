//! Per-plot growth state machine and environmental stress.
//!
//! Each tick, every planted plot is recomputed from the current day and the
//! latest environmental snapshot:
//!
//! 1. Progress is the elapsed fraction of the crop's growth time, clamped to
//!    `[0, 1]`, and the stage is a pure function of progress.
//! 2. A mature plot's expected yield is refreshed.
//! 3. Stress penalties multiply health, in a fixed order.
//! 4. Soil moisture drains and soil-building crops enrich fertility.
//!
//! Temperature and NDVI stress are only applied when the corresponding
//! snapshot domain is genuine; synthetic readings never hurt crops.

use harvest_types::{EnvironmentalSnapshot, GrowthStage, Plot};

use crate::catalog::CropCatalog;

/// Health multiplier when air temperature is outside the crop's band.
pub const TEMPERATURE_STRESS: f64 = 0.95;

/// Health multiplier when soil moisture is below the crop's water need.
pub const WATER_STRESS: f64 = 0.98;

/// Health multiplier when fertility is below [`FERTILITY_THRESHOLD`].
pub const NUTRIENT_STRESS: f64 = 0.99;

/// Health multiplier when NDVI is below [`NDVI_THRESHOLD`].
pub const VEGETATION_STRESS: f64 = 0.97;

/// Fertility below this sets `needs_fertilizer`.
pub const FERTILITY_THRESHOLD: f64 = 0.5;

/// NDVI below this indicates stressed vegetation.
pub const NDVI_THRESHOLD: f64 = 0.4;

/// Soil moisture lost per tick.
pub const MOISTURE_DRAIN: f64 = 0.02;

/// Soil moisture never drains below this.
pub const MOISTURE_FLOOR: f64 = 0.1;

/// Per-tick fertility gain per unit of positive soil-health impact.
pub const SOIL_BUILDING_RATE: f64 = 0.001;

/// Per-plot faults. A faulty plot is skipped for the tick; others proceed.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// The plot's crop is not in the catalog.
    #[error("plot {plot_id} has unknown crop {crop:?}")]
    UnknownCrop {
        /// The faulty plot.
        plot_id: usize,
        /// The unrecognized crop id.
        crop: String,
    },

    /// The crop has a zero growth time, so progress is undefined.
    #[error("crop {crop:?} on plot {plot_id} has zero growth time")]
    ZeroGrowthTime {
        /// The faulty plot.
        plot_id: usize,
        /// The crop id.
        crop: String,
    },
}

/// Environmental readings that may stress crops this tick.
///
/// A `None` field means the reading is not trusted (synthetic) and the
/// associated stress is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StressInputs {
    /// Air temperature in degrees Celsius, if genuine.
    pub temperature: Option<f64>,
    /// NDVI, if genuine.
    pub ndvi: Option<f64>,
}

impl StressInputs {
    /// Take temperature and NDVI from a snapshot, gated on provenance.
    pub fn from_snapshot(snapshot: &EnvironmentalSnapshot) -> Self {
        Self {
            temperature: snapshot
                .provenance
                .weather
                .is_genuine()
                .then_some(snapshot.weather.temperature),
            ndvi: snapshot
                .provenance
                .vegetation
                .is_genuine()
                .then_some(snapshot.vegetation.ndvi),
        }
    }
}

/// What happened to one plot during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlotOutcome {
    /// Whether the plot had a crop and was recomputed.
    pub updated: bool,
    /// Whether the crop reached maturity on this tick.
    pub newly_mature: bool,
}

/// Expected harvest: `floor(base_yield * health * fertility)`.
///
/// Health and fertility are clamped to `[0, 1]`, so the result never
/// exceeds `base_yield`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn crop_yield(base_yield: u32, health: f64, fertility: f64) -> u32 {
    let factor = health.clamp(0.0, 1.0) * fertility.clamp(0.0, 1.0);
    if factor.is_nan() {
        return 0;
    }
    // Bounded by [0, base_yield], which fits in u32.
    (f64::from(base_yield) * factor).floor() as u32
}

/// Recompute one plot for `day`.
///
/// Empty plots are left untouched.
///
/// # Errors
///
/// Returns [`PlotError`] if the plot's crop is unknown or has zero growth
/// time. The plot is not modified in that case.
pub fn update_plot(
    plot: &mut Plot,
    crops: &CropCatalog,
    day: u32,
    stress: StressInputs,
) -> Result<PlotOutcome, PlotError> {
    let Some(crop_id) = plot.crop.as_deref() else {
        return Ok(PlotOutcome::default());
    };
    let crop = crops.get(crop_id).ok_or_else(|| PlotError::UnknownCrop {
        plot_id: plot.id,
        crop: crop_id.to_owned(),
    })?;
    if crop.growth_time == 0 {
        return Err(PlotError::ZeroGrowthTime {
            plot_id: plot.id,
            crop: crop.id.clone(),
        });
    }

    let was_mature = plot.growth_stage == GrowthStage::Mature;

    let days_grown = day.saturating_sub(plot.planted_day);
    let progress = (f64::from(days_grown) / f64::from(crop.growth_time)).clamp(0.0, 1.0);
    plot.growth_progress = progress;
    plot.growth_stage = GrowthStage::from_progress(progress);

    if plot.growth_stage == GrowthStage::Mature {
        plot.yield_amount = crop_yield(crop.base_yield, plot.health, plot.fertility);
    }

    let outside_band = |t: f64| t < crop.temp_min || t > crop.temp_max;
    if stress.temperature.is_some_and(outside_band) {
        plot.health *= TEMPERATURE_STRESS;
    }
    if plot.soil_moisture < crop.water_need {
        plot.health *= WATER_STRESS;
        plot.needs_water = true;
    }
    if plot.fertility < FERTILITY_THRESHOLD {
        plot.health *= NUTRIENT_STRESS;
        plot.needs_fertilizer = true;
    }
    if stress.ndvi.is_some_and(|ndvi| ndvi < NDVI_THRESHOLD) {
        plot.health *= VEGETATION_STRESS;
    }
    plot.health = plot.health.clamp(0.0, 1.0);

    plot.soil_moisture = (plot.soil_moisture - MOISTURE_DRAIN).max(MOISTURE_FLOOR).min(1.0);
    if crop.soil_health_impact > 0.0 {
        plot.fertility = (plot.fertility + crop.soil_health_impact * SOIL_BUILDING_RATE).min(1.0);
    }

    Ok(PlotOutcome {
        updated: true,
        newly_mature: !was_mature && plot.growth_stage == GrowthStage::Mature,
    })
}
