//! Derived sustainability metrics.

use std::collections::BTreeSet;

use harvest_types::{GameState, SustainabilityReport};

use crate::catalog::CropCatalog;

/// Number of distinct crops that counts as full biodiversity.
const BIODIVERSITY_TARGET: f64 = 5.0;

/// Compute the sustainability report for a farm.
pub fn report(state: &GameState, crops: &CropCatalog) -> SustainabilityReport {
    let carbon_sequestration = carbon_sequestration(state, crops);
    let water_efficiency = water_efficiency(state);
    let soil_health = soil_health(state);
    let biodiversity = biodiversity(state);

    let mut recommendations = Vec::new();
    if carbon_sequestration < 2.0 {
        recommendations.push("Plant cover crops to increase carbon sequestration".to_owned());
    }
    if water_efficiency < 0.5 {
        recommendations.push("Implement drip irrigation to improve water efficiency".to_owned());
    }
    if biodiversity < 0.6 {
        recommendations.push(
            "Diversify crops to improve biodiversity and reduce pest pressure".to_owned(),
        );
    }
    if recommendations.is_empty() {
        recommendations.push("Great job! Your farm is operating sustainably".to_owned());
    }

    SustainabilityReport {
        carbon_sequestration,
        water_efficiency,
        soil_health,
        biodiversity,
        recommendations,
    }
}

/// Sum of crop sequestration times plot health over planted plots.
/// Plots whose crop is missing from the catalog contribute nothing.
pub fn carbon_sequestration(state: &GameState, crops: &CropCatalog) -> f64 {
    state
        .plots
        .iter()
        .filter_map(|plot| {
            let crop = crops.get(plot.crop.as_deref()?)?;
            Some(crop.carbon_sequestration * plot.health)
        })
        .sum()
}

/// Score per unit of water used; 1.0 before any irrigation.
pub fn water_efficiency(state: &GameState) -> f64 {
    if state.water_usage <= 0.0 {
        return 1.0;
    }
    lossy_f64(state.score) / state.water_usage
}

/// Mean plot fertility; 0.0 for a farm with no plots.
pub fn soil_health(state: &GameState) -> f64 {
    let count = state.plots.len();
    if count == 0 {
        return 0.0;
    }
    let total: f64 = state.plots.iter().map(|p| p.fertility).sum();
    total / lossy_f64(i64::try_from(count).unwrap_or(i64::MAX))
}

/// Distinct planted crops over five, capped at 1.0.
pub fn biodiversity(state: &GameState) -> f64 {
    let distinct: BTreeSet<&str> = state
        .plots
        .iter()
        .filter_map(|p| p.crop.as_deref())
        .collect();
    let count = u32::try_from(distinct.len()).unwrap_or(u32::MAX);
    (f64::from(count) / BIODIVERSITY_TARGET).min(1.0)
}

/// Game counters stay far below 2^53, where the conversion is exact.
#[allow(clippy::cast_precision_loss)]
const fn lossy_f64(value: i64) -> f64 {
    value as f64
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;
    use harvest_types::Plot;

    use super::*;
    use crate::config::GameConfig;
    use crate::state::initial_state;

    fn farm(plots: Vec<Plot>) -> GameState {
        let mut state = initial_state(&GameConfig::default(), Utc::now());
        state.plots = plots;
        state
    }

    fn planted(id: usize, crop: &str, health: f64, fertility: f64) -> Plot {
        let mut plot = Plot::empty(id, 0.5, fertility);
        plot.crop = Some(crop.to_owned());
        plot.health = health;
        plot
    }

    #[test]
    fn carbon_weights_sequestration_by_health() {
        let state = farm(vec![
            planted(0, "coverCrop", 1.0, 0.8),
            planted(1, "soybean", 0.5, 0.8),
            Plot::empty(2, 0.5, 0.8),
        ]);
        // 1.2 * 1.0 + 0.8 * 0.5
        let carbon = carbon_sequestration(&state, &CropCatalog::builtin());
        assert!((carbon - 1.6).abs() < 1e-12);
    }

    #[test]
    fn water_efficiency_defaults_to_one() {
        let mut state = farm(vec![]);
        assert_eq!(water_efficiency(&state), 1.0);

        state.water_usage = 200.0;
        state.score = 50;
        assert_eq!(water_efficiency(&state), 0.25);
    }

    #[test]
    fn soil_health_is_mean_fertility() {
        let state = farm(vec![Plot::empty(0, 0.5, 0.6), Plot::empty(1, 0.5, 1.0)]);
        assert!((soil_health(&state) - 0.8).abs() < 1e-12);
        assert_eq!(soil_health(&farm(vec![])), 0.0);
    }

    #[test]
    fn biodiversity_counts_distinct_crops() {
        let state = farm(vec![
            planted(0, "corn", 1.0, 0.8),
            planted(1, "corn", 1.0, 0.8),
            planted(2, "wheat", 1.0, 0.8),
        ]);
        assert!((biodiversity(&state) - 0.4).abs() < 1e-12);

        let all: Vec<Plot> = ["corn", "wheat", "soybean", "tomato", "coverCrop", "rye"]
            .iter()
            .enumerate()
            .map(|(i, c)| planted(i, c, 1.0, 0.8))
            .collect();
        assert_eq!(biodiversity(&farm(all)), 1.0);
    }

    #[test]
    fn fresh_farm_gets_improvement_advice() {
        let state = farm(vec![Plot::empty(0, 0.5, 0.8)]);
        let report = report(&state, &CropCatalog::builtin());
        assert_eq!(report.recommendations.len(), 2);
        assert!(report.recommendations[0].contains("cover crops"));
        assert!(report.recommendations[1].contains("Diversify"));
    }

    #[test]
    fn thriving_farm_is_praised() {
        let state = farm(vec![
            planted(0, "coverCrop", 1.0, 0.9),
            planted(1, "soybean", 1.0, 0.9),
            planted(2, "wheat", 1.0, 0.9),
        ]);
        let report = report(&state, &CropCatalog::builtin());
        assert_eq!(
            report.recommendations,
            vec!["Great job! Your farm is operating sustainably".to_owned()]
        );
    }
}
