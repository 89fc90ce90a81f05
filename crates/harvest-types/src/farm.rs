//! Farm entities: crops, plots, livestock, and the game state.
//!
//! Plots are created once when the farm is initialized and are never
//! destroyed; harvesting resets a plot to its empty variant via
//! [`Plot::reset_to_empty`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{GrowthStage, Season};
use crate::environment::Coordinates;

// ---------------------------------------------------------------------------
// Static catalog entries
// ---------------------------------------------------------------------------

/// Static description of a plantable crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Crop {
    /// Catalog key (e.g. `corn`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Days from planting to maturity.
    pub growth_time: u32,
    /// Minimum soil moisture fraction before water stress sets in.
    pub water_need: f64,
    /// Lower bound of the tolerated air temperature in degrees Celsius.
    pub temp_min: f64,
    /// Upper bound of the tolerated air temperature in degrees Celsius.
    pub temp_max: f64,
    /// Planting cost debited from the budget.
    pub cost: i64,
    /// Yield at full health and full fertility.
    pub base_yield: u32,
    /// Display glyph for the dashboard.
    pub emoji: String,
    /// Carbon sequestered per tick at full health.
    pub carbon_sequestration: f64,
    /// Fertility contribution; positive values slowly enrich the soil.
    pub soil_health_impact: f64,
    /// Resistance to pests in `[0, 1]`.
    pub pest_resistance: f64,
}

/// A selectable farm location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FarmLocation {
    /// Catalog key (e.g. `iowa`).
    pub id: String,
    /// Agricultural region name.
    pub region: String,
    /// Representative coordinate.
    pub coordinates: Coordinates,
    /// Climate classification.
    pub climate: String,
    /// Dominant soil type.
    pub soil_type: String,
    /// Elevation in metres.
    pub elevation: u32,
}

/// A kind of extreme weather event the farm can face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WeatherEvent {
    /// Event kind (e.g. `drought`).
    pub kind: String,
    /// Severity in `[0, 1]`.
    pub severity: f64,
    /// Typical duration in days.
    pub duration_days: u32,
    /// Description of the effect on the farm.
    pub impact: String,
    /// Probability of occurrence per season.
    pub probability: f64,
}

// ---------------------------------------------------------------------------
// Plots and livestock
// ---------------------------------------------------------------------------

/// One cultivable plot of land.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Plot {
    /// Stable index of the plot within the farm.
    pub id: usize,
    /// Catalog key of the planted crop, if any.
    pub crop: Option<String>,
    /// Game day on which the crop was planted.
    pub planted_day: u32,
    /// Current life-cycle stage.
    pub growth_stage: GrowthStage,
    /// Fraction of the growth period elapsed, in `[0, 1]`.
    pub growth_progress: f64,
    /// Soil moisture fraction, in `[0, 1]`.
    pub soil_moisture: f64,
    /// Soil fertility, in `[0, 1]`.
    pub fertility: f64,
    /// Crop health, in `[0, 1]`.
    pub health: f64,
    /// Set when moisture fell below the crop's water need.
    pub needs_water: bool,
    /// Set when fertility fell below 0.5.
    pub needs_fertilizer: bool,
    /// Expected harvest; only non-zero once mature.
    #[serde(rename = "yield")]
    pub yield_amount: u32,
}

impl Plot {
    /// Create an empty plot with the given soil conditions and full health.
    pub fn empty(id: usize, soil_moisture: f64, fertility: f64) -> Self {
        Self {
            id,
            crop: None,
            planted_day: 0,
            growth_stage: GrowthStage::Empty,
            growth_progress: 0.0,
            soil_moisture: soil_moisture.clamp(0.0, 1.0),
            fertility: fertility.clamp(0.0, 1.0),
            health: 1.0,
            needs_water: false,
            needs_fertilizer: false,
            yield_amount: 0,
        }
    }

    /// Whether a crop is growing on this plot.
    pub const fn is_planted(&self) -> bool {
        self.crop.is_some()
    }

    /// Clear the crop after harvest. Soil moisture and fertility persist.
    pub fn reset_to_empty(&mut self) {
        self.crop = None;
        self.planted_day = 0;
        self.growth_stage = GrowthStage::Empty;
        self.growth_progress = 0.0;
        self.yield_amount = 0;
        self.health = 1.0;
    }
}

/// A herd of one livestock kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Livestock {
    /// Stable index of the herd.
    pub id: usize,
    /// Animal kind (e.g. `cattle`).
    pub kind: String,
    /// Number of animals.
    pub count: u32,
    /// Herd health, in `[0, 1]`.
    pub health: f64,
    /// Herd productivity, in `[0, 1]`.
    pub productivity: f64,
    /// Feed required per animal per day.
    pub feed_need: f64,
    /// Water required per animal per day.
    pub water_need: f64,
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// The complete mutable state of one farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// In-game day counter, starting at 1.
    pub day: u32,
    /// Season derived from the day counter.
    pub season: Season,
    /// Available money.
    pub budget: i64,
    /// Accumulated score.
    pub score: i64,
    /// Accumulated sustainability score.
    pub sustainability_score: i64,
    /// Cumulative irrigation water usage.
    pub water_usage: f64,
    /// Cumulative carbon footprint from fertilizer use.
    pub carbon_footprint: f64,
    /// Farm archetype label.
    pub farm_type: String,
    /// All plots, indexed by plot id.
    pub plots: Vec<Plot>,
    /// All herds.
    pub livestock: Vec<Livestock>,
    /// Wall-clock time of the last successful mutation.
    pub last_updated: DateTime<Utc>,
}

impl GameState {
    /// Look up a plot by id.
    pub fn plot(&self, plot_id: usize) -> Option<&Plot> {
        self.plots.get(plot_id)
    }
}

/// Derived sustainability metrics for the farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SustainabilityReport {
    /// Sum over planted plots of crop sequestration times plot health.
    pub carbon_sequestration: f64,
    /// Score per unit of water used; 1.0 before any irrigation.
    pub water_efficiency: f64,
    /// Mean plot fertility.
    pub soil_health: f64,
    /// Distinct planted crops over five, capped at 1.0.
    pub biodiversity: f64,
    /// Suggested improvements.
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_plot_clamps_soil() {
        let plot = Plot::empty(3, 1.4, -0.2);
        assert_eq!(plot.id, 3);
        assert!((plot.soil_moisture - 1.0).abs() < f64::EPSILON);
        assert!(plot.fertility.abs() < f64::EPSILON);
        assert_eq!(plot.growth_stage, GrowthStage::Empty);
        assert!(!plot.is_planted());
    }

    #[test]
    fn reset_keeps_soil_and_restores_health() {
        let mut plot = Plot::empty(0, 0.5, 0.8);
        plot.crop = Some("corn".to_owned());
        plot.planted_day = 4;
        plot.growth_stage = GrowthStage::Mature;
        plot.growth_progress = 1.0;
        plot.health = 0.6;
        plot.yield_amount = 57;

        plot.reset_to_empty();

        assert!(plot.crop.is_none());
        assert_eq!(plot.planted_day, 0);
        assert_eq!(plot.growth_stage, GrowthStage::Empty);
        assert_eq!(plot.yield_amount, 0);
        assert!((plot.health - 1.0).abs() < f64::EPSILON);
        assert!((plot.fertility - 0.8).abs() < f64::EPSILON);
        assert!((plot.soil_moisture - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn plot_yield_serializes_as_yield() {
        let plot = Plot::empty(0, 0.5, 0.8);
        let json = serde_json::to_value(&plot).unwrap_or_default();
        assert!(json.get("yield").is_some());
        assert!(json.get("growthStage").is_some());
    }
}
