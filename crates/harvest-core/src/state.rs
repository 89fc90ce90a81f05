//! Farm initialization.
//!
//! Plots are created here once, with randomized soil, and are never added
//! or removed afterwards.

use chrono::{DateTime, Utc};
use harvest_types::{GameState, Livestock, Plot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::{FIRST_DAY, FarmClock};
use crate::config::GameConfig;

/// Build the starting state for a new farm.
///
/// Each plot starts empty with full health, moisture in `[0.3, 0.8)`, and
/// fertility in `[0.7, 1.0)`. Passing a seed makes the soil reproducible.
pub fn initial_state(config: &GameConfig, now: DateTime<Utc>) -> GameState {
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);

    let plots = (0..config.plot_count)
        .map(|id| {
            let moisture = 0.3 + rng.random::<f64>() * 0.5;
            let fertility = 0.7 + rng.random::<f64>() * 0.3;
            Plot::empty(id, moisture, fertility)
        })
        .collect();

    GameState {
        day: FIRST_DAY,
        season: FarmClock::season_for(FIRST_DAY, config.days_per_season),
        budget: config.initial_budget,
        score: 0,
        sustainability_score: config.initial_sustainability,
        water_usage: 0.0,
        carbon_footprint: 0.0,
        farm_type: config.farm_type.clone(),
        plots,
        livestock: starting_herds(),
        last_updated: now,
    }
}

fn starting_herds() -> Vec<Livestock> {
    vec![
        Livestock {
            id: 0,
            kind: "cattle".to_owned(),
            count: 5,
            health: 0.8,
            productivity: 0.7,
            feed_need: 25.0,
            water_need: 50.0,
        },
        Livestock {
            id: 1,
            kind: "chickens".to_owned(),
            count: 20,
            health: 0.9,
            productivity: 0.8,
            feed_need: 5.0,
            water_need: 2.0,
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use harvest_types::{GrowthStage, Season};

    use super::*;

    fn seeded(seed: u64) -> GameConfig {
        GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        }
    }

    #[test]
    fn new_farm_defaults() {
        let state = initial_state(&seeded(1), Utc::now());
        assert_eq!(state.day, 1);
        assert_eq!(state.season, Season::Spring);
        assert_eq!(state.budget, 10_000);
        assert_eq!(state.score, 0);
        assert_eq!(state.sustainability_score, 50);
        assert_eq!(state.farm_type, "smallholder");
        assert_eq!(state.plots.len(), 16);
        assert_eq!(state.livestock.len(), 2);
        assert_eq!(state.livestock[0].kind, "cattle");
        assert_eq!(state.livestock[1].count, 20);
    }

    #[test]
    fn plots_start_empty_with_randomized_soil() {
        let state = initial_state(&seeded(2), Utc::now());
        for (index, plot) in state.plots.iter().enumerate() {
            assert_eq!(plot.id, index);
            assert_eq!(plot.growth_stage, GrowthStage::Empty);
            assert_eq!(plot.health, 1.0);
            assert!((0.3..0.8).contains(&plot.soil_moisture));
            assert!((0.7..1.0).contains(&plot.fertility));
        }
    }

    #[test]
    fn seed_makes_soil_reproducible() {
        let now = Utc::now();
        let a = initial_state(&seeded(9), now);
        let b = initial_state(&seeded(9), now);
        assert_eq!(a.plots, b.plots);
    }
}
