//! The farm engine: shared game state plus the environment it grows in.
//!
//! All mutation goes through one write lock. Player actions and ticks
//! each hold it for their whole read-check-write, so they never
//! interleave. The environmental snapshot is fetched before the lock is
//! taken; network latency never blocks actions.

use std::sync::Arc;

use chrono::Utc;
use harvest_environment::{EnvironmentAggregator, EnvironmentSource};
use harvest_types::{
    Action, EnvironmentalSnapshot, FarmLocation, GameState, RejectionReason,
    SustainabilityReport, WeatherEvent,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::actions;
use crate::catalog::{self, CropCatalog, LocationCatalog};
use crate::clock::FarmClock;
use crate::config::{ConfigError, HarvestConfig};
use crate::state::initial_state;
use crate::sustainability;
use crate::tick::{self, TickError, TickSummary};

/// A player action that failed validation. The state was not changed.
#[derive(Debug, thiserror::Error)]
#[error("{} rejected: {reason}", .action.name())]
pub struct ActionRejected {
    /// The action as submitted.
    pub action: Action,
    /// Why it was refused.
    pub reason: RejectionReason,
}

/// Owns the game state and drives it forward.
pub struct FarmEngine<S> {
    state: RwLock<GameState>,
    aggregator: Arc<EnvironmentAggregator<S>>,
    crops: CropCatalog,
    locations: LocationCatalog,
    farm: FarmLocation,
    weather_events: Vec<WeatherEvent>,
    days_per_season: u32,
}

impl<S: EnvironmentSource> FarmEngine<S> {
    /// Create an engine with a freshly initialized farm.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the farm location is not in the
    /// catalog or the season length is zero.
    pub fn new(
        config: &HarvestConfig,
        aggregator: Arc<EnvironmentAggregator<S>>,
    ) -> Result<Self, ConfigError> {
        let state = initial_state(&config.game, Utc::now());
        Self::with_state(config, aggregator, state)
    }

    /// Create an engine around an existing state.
    ///
    /// # Errors
    ///
    /// Same as [`FarmEngine::new`].
    pub fn with_state(
        config: &HarvestConfig,
        aggregator: Arc<EnvironmentAggregator<S>>,
        state: GameState,
    ) -> Result<Self, ConfigError> {
        let clock = FarmClock::new(config.game.days_per_season).map_err(|err| {
            ConfigError::Invalid {
                reason: err.to_string(),
            }
        })?;
        let locations = LocationCatalog::builtin();
        let farm = locations
            .get(&config.game.farm_location)
            .cloned()
            .ok_or_else(|| ConfigError::Invalid {
                reason: format!("unknown farm location {:?}", config.game.farm_location),
            })?;

        Ok(Self {
            state: RwLock::new(state),
            aggregator,
            crops: config.crop_catalog(),
            locations,
            farm,
            weather_events: catalog::weather_events(),
            days_per_season: clock.days_per_season(),
        })
    }

    /// Advance the farm by one day.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the day counter cannot advance.
    pub async fn tick(&self) -> Result<TickSummary, TickError> {
        let snapshot = self.environment().await;

        let mut state = self.state.write().await;
        let summary = tick::run_tick(
            &mut state,
            &self.crops,
            self.days_per_season,
            &snapshot,
            Utc::now(),
        )?;
        drop(state);

        debug!(
            day = summary.day,
            updated = summary.plots_updated,
            skipped = summary.plots_skipped,
            "tick applied"
        );
        Ok(summary)
    }

    /// Validate and apply a player action, returning the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`ActionRejected`] if validation fails; nothing is mutated.
    pub async fn apply_action(&self, action: Action) -> Result<GameState, ActionRejected> {
        let mut state = self.state.write().await;
        match actions::apply_action(&mut state, &action, &self.crops, Utc::now()) {
            Ok(()) => {
                info!(action = action.name(), budget = state.budget, "action applied");
                Ok(state.clone())
            }
            Err(reason) => {
                info!(action = action.name(), %reason, "action rejected");
                Err(ActionRejected { action, reason })
            }
        }
    }

    /// A copy of the current state.
    pub async fn state(&self) -> GameState {
        self.state.read().await.clone()
    }

    /// Sustainability report for the current state.
    pub async fn sustainability(&self) -> SustainabilityReport {
        let state = self.state.read().await;
        sustainability::report(&state, &self.crops)
    }

    /// Latest environment at the farm's coordinates.
    pub async fn environment(&self) -> Arc<EnvironmentalSnapshot> {
        self.aggregator
            .fetch_environment(self.farm.coordinates)
            .await
    }

    /// The crop catalog in use.
    pub const fn crops(&self) -> &CropCatalog {
        &self.crops
    }

    /// The farm location catalog.
    pub const fn locations(&self) -> &LocationCatalog {
        &self.locations
    }

    /// Where this farm is.
    pub const fn farm_location(&self) -> &FarmLocation {
        &self.farm
    }

    /// Weather event descriptions.
    pub fn weather_events(&self) -> &[WeatherEvent] {
        &self.weather_events
    }

    /// The shared aggregator.
    pub const fn aggregator(&self) -> &Arc<EnvironmentAggregator<S>> {
        &self.aggregator
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use harvest_environment::{AggregatorConfig, OfflineSource};
    use harvest_types::GrowthStage;

    use super::*;
    use crate::config::GameConfig;

    fn offline_config() -> HarvestConfig {
        HarvestConfig {
            game: GameConfig {
                seed: Some(11),
                ..GameConfig::default()
            },
            environment: AggregatorConfig {
                offline: true,
                ..AggregatorConfig::default()
            },
            ..HarvestConfig::default()
        }
    }

    fn engine(config: &HarvestConfig) -> FarmEngine<OfflineSource> {
        let aggregator = EnvironmentAggregator::new(OfflineSource, &config.environment);
        FarmEngine::new(config, Arc::new(aggregator)).unwrap()
    }

    #[tokio::test]
    async fn unknown_location_is_rejected() {
        let mut config = offline_config();
        config.game.farm_location = "atlantis".to_owned();
        let aggregator = Arc::new(EnvironmentAggregator::new(
            OfflineSource,
            &config.environment,
        ));
        assert!(matches!(
            FarmEngine::new(&config, aggregator),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[tokio::test]
    async fn plant_then_tick() {
        let config = offline_config();
        let engine = engine(&config);

        let after = engine
            .apply_action(Action::Plant {
                plot_id: 0,
                crop: "corn".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(after.budget, 9_950);
        assert_eq!(after.plots[0].growth_stage, GrowthStage::Seedling);

        let summary = engine.tick().await.unwrap();
        assert_eq!(summary.day, 2);
        assert_eq!(summary.plots_updated, 1);
        assert!(summary.temperature_gated);

        let state = engine.state().await;
        assert_eq!(state.day, 2);
    }

    #[tokio::test]
    async fn rejected_action_keeps_state() {
        let config = offline_config();
        let engine = engine(&config);
        let before = engine.state().await;

        let err = engine
            .apply_action(Action::Harvest { plot_id: 0 })
            .await
            .unwrap_err();
        assert!(matches!(err.reason, RejectionReason::NotMature { .. }));
        assert!(err.to_string().starts_with("harvest rejected"));
        assert_eq!(engine.state().await, before);
    }

    #[tokio::test]
    async fn catalogs_are_exposed() {
        let config = offline_config();
        let engine = engine(&config);
        assert_eq!(engine.farm_location().id, "iowa");
        assert!(engine.crops().get("corn").is_some());
        assert!(engine.locations().get("california").is_some());
        assert!(!engine.weather_events().is_empty());
        assert!(!engine.sustainability().await.recommendations.is_empty());
    }
}
