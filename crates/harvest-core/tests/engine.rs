//! Integration tests for the farm engine.
//!
//! These drive [`FarmEngine`] through its public surface with scripted
//! environment sources: concurrent mutation, budget races, and stress
//! gating on data provenance.

#![allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::sync::Arc;

use harvest_core::config::GameConfig;
use harvest_core::growth::crop_yield;
use harvest_core::{FarmEngine, HarvestConfig};
use harvest_environment::{
    AggregatorConfig, EnvironmentAggregator, EnvironmentSource, OfflineSource, SourceError,
};
use harvest_types::{
    Action, Coordinates, EnvironmentDomain, GrowthStage, PrecipitationRecord, RejectionReason,
    SoilRecord, VegetationHealth, VegetationRecord, WeatherRecord,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn config(offline: bool, initial_budget: i64) -> HarvestConfig {
    HarvestConfig {
        game: GameConfig {
            seed: Some(21),
            initial_budget,
            ..GameConfig::default()
        },
        environment: AggregatorConfig {
            offline,
            ..AggregatorConfig::default()
        },
        ..HarvestConfig::default()
    }
}

fn engine_with<S: EnvironmentSource>(source: S, config: &HarvestConfig) -> Arc<FarmEngine<S>> {
    let aggregator = Arc::new(EnvironmentAggregator::new(source, &config.environment));
    Arc::new(FarmEngine::new(config, aggregator).unwrap())
}

/// Genuine heatwave weather and sparse vegetation; soil and rain unset.
struct HeatwaveSource;

impl EnvironmentSource for HeatwaveSource {
    async fn fetch_weather(&self, _at: Coordinates) -> Result<WeatherRecord, SourceError> {
        Ok(WeatherRecord {
            temperature: 38.0,
            humidity: 20.0,
            wind_speed: 8.0,
            pressure: 1010.0,
            cloud_cover: 0.0,
            solar_radiation: 900.0,
            source: "fixture".to_owned(),
        })
    }

    async fn fetch_soil(&self, _at: Coordinates) -> Result<SoilRecord, SourceError> {
        Err(SourceError::NotConfigured {
            domain: EnvironmentDomain::Soil,
        })
    }

    async fn fetch_vegetation(&self, _at: Coordinates) -> Result<VegetationRecord, SourceError> {
        Ok(VegetationRecord {
            ndvi: 0.35,
            evi: 0.25,
            lai: 1.5,
            health: VegetationHealth::from_ndvi(0.35),
            source: "fixture".to_owned(),
            resolution: "250m".to_owned(),
        })
    }

    async fn fetch_precipitation(
        &self,
        _at: Coordinates,
    ) -> Result<PrecipitationRecord, SourceError> {
        Err(SourceError::NotConfigured {
            domain: EnvironmentDomain::Precipitation,
        })
    }

    async fn reverse_geocode(&self, _at: Coordinates) -> Result<Option<String>, SourceError> {
        Ok(Some("Story County, Iowa".to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Serialized mutation
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_actions_and_ticks_lose_no_updates() {
    let cfg = config(true, 10_000);
    let engine = engine_with(OfflineSource, &cfg);

    let mut handles = Vec::new();
    for i in 0..48_usize {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine
                .apply_action(Action::Irrigate { plot_id: i % 16 })
                .await
                .map(|_| ())
                .map_err(|err| err.to_string())
        }));
    }
    for _ in 0..10 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.tick().await.map(|_| ()).map_err(|err| err.to_string())
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let state = engine.state().await;
    assert_eq!(state.day, 11);
    assert_eq!(state.budget, 10_000 - 48 * 20);
    assert_eq!(state.score, 48 * 10);
    assert_eq!(state.water_usage, 4_800.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn budget_cannot_be_overspent_by_racing_actions() {
    let cfg = config(true, 100);
    let engine = engine_with(OfflineSource, &cfg);

    let mut handles = Vec::new();
    for i in 0..10_usize {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.apply_action(Action::Fertilize { plot_id: i }).await
        }));
    }

    let mut applied = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => applied += 1,
            Err(rejected) => {
                assert!(matches!(
                    rejected.reason,
                    RejectionReason::InsufficientBudget { required: 30, .. }
                ));
                refused += 1;
            }
        }
    }

    assert_eq!(applied, 3);
    assert_eq!(refused, 7);
    assert_eq!(engine.state().await.budget, 10);
}

// ---------------------------------------------------------------------------
// Provenance gating
// ---------------------------------------------------------------------------

#[tokio::test]
async fn genuine_heatwave_stresses_crops_synthetic_does_not() {
    let hot = engine_with(HeatwaveSource, &config(false, 10_000));
    let calm = engine_with(OfflineSource, &config(true, 10_000));

    let plant = Action::Plant {
        plot_id: 3,
        crop: "corn".to_owned(),
    };
    hot.apply_action(plant.clone()).await.unwrap();
    calm.apply_action(plant).await.unwrap();

    let hot_summary = hot.tick().await.unwrap();
    let calm_summary = calm.tick().await.unwrap();

    assert!(!hot_summary.temperature_gated);
    assert!(!hot_summary.ndvi_gated);
    assert_eq!(hot_summary.genuine_domains, 2);
    assert_eq!(hot_summary.location, "Story County, Iowa");
    assert!(calm_summary.temperature_gated);
    assert!(calm_summary.ndvi_gated);

    let hot_health = hot.state().await.plots[3].health;
    let calm_health = calm.state().await.plots[3].health;
    // 38 C is outside corn's 15-30 C band, and NDVI 0.35 is below 0.4.
    assert!((hot_health / calm_health - 0.95 * 0.97).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Full season
// ---------------------------------------------------------------------------

#[tokio::test]
async fn corn_grows_to_harvest() {
    let cfg = config(true, 10_000);
    let engine = engine_with(OfflineSource, &cfg);

    engine
        .apply_action(Action::Plant {
            plot_id: 0,
            crop: "corn".to_owned(),
        })
        .await
        .unwrap();

    let mut matured_on = None;
    for _ in 0..90 {
        let summary = engine.tick().await.unwrap();
        if summary.newly_mature.contains(&0) {
            matured_on = Some(summary.day);
        }
    }
    // Planted on day 1 with a 90-day growth time.
    assert_eq!(matured_on, Some(91));

    let before = engine.state().await;
    let plot = &before.plots[0];
    assert_eq!(plot.growth_stage, GrowthStage::Mature);
    let expected = i64::from(crop_yield(120, plot.health, plot.fertility));

    let after = engine
        .apply_action(Action::Harvest { plot_id: 0 })
        .await
        .unwrap();
    assert_eq!(after.score, before.score + expected);
    assert_eq!(after.budget, before.budget + expected * 2);
    assert!(after.plots[0].crop.is_none());
}
