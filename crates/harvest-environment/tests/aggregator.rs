//! Integration tests for the environment aggregator.
//!
//! Each test injects a scripted [`EnvironmentSource`] to exercise fallback,
//! isolation, caching, and timeout behaviour without a network.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use harvest_environment::{AggregatorConfig, EnvironmentAggregator, EnvironmentSource, SourceError};
use harvest_types::{
    Coordinates, EnvironmentDomain, PrecipitationKind, PrecipitationRecord, Provenance,
    SoilRecord, VegetationHealth, VegetationRecord, WeatherRecord,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn genuine_weather() -> WeatherRecord {
    WeatherRecord {
        temperature: 22.5,
        humidity: 55.0,
        wind_speed: 12.0,
        pressure: 1015.0,
        cloud_cover: 25.0,
        solar_radiation: 640.0,
        source: "fixture".to_owned(),
    }
}

fn genuine_soil() -> SoilRecord {
    SoilRecord {
        surface_moisture: 0.33,
        root_zone_moisture: 0.29,
        soil_temperature: 18.0,
        organic_matter: 4.0,
        ph: 6.5,
        salinity: 1.0,
        fertility: 0.75,
        source: "fixture".to_owned(),
        resolution: "9km".to_owned(),
    }
}

fn genuine_vegetation() -> VegetationRecord {
    VegetationRecord {
        ndvi: 0.35,
        evi: 0.28,
        lai: 2.1,
        health: VegetationHealth::from_ndvi(0.35),
        source: "fixture".to_owned(),
        resolution: "250m".to_owned(),
    }
}

fn genuine_precipitation() -> PrecipitationRecord {
    PrecipitationRecord {
        daily: 3.0,
        weekly_total: 14.0,
        monthly_total: 60.0,
        kind: PrecipitationKind::from_daily_mm(3.0),
        source: "fixture".to_owned(),
        resolution: "11km".to_owned(),
    }
}

const IOWA: Coordinates = Coordinates::new(42.0308, -93.6319);

// ---------------------------------------------------------------------------
// Fake sources
// ---------------------------------------------------------------------------

/// Every domain answers with a server error.
struct FailingSource;

impl EnvironmentSource for FailingSource {
    async fn fetch_weather(&self, _at: Coordinates) -> Result<WeatherRecord, SourceError> {
        Err(SourceError::Status {
            domain: EnvironmentDomain::Weather,
            status: 503,
        })
    }

    async fn fetch_soil(&self, _at: Coordinates) -> Result<SoilRecord, SourceError> {
        Err(SourceError::Status {
            domain: EnvironmentDomain::Soil,
            status: 500,
        })
    }

    async fn fetch_vegetation(&self, _at: Coordinates) -> Result<VegetationRecord, SourceError> {
        Err(SourceError::Decode {
            domain: EnvironmentDomain::Vegetation,
            reason: "garbage".to_owned(),
        })
    }

    async fn fetch_precipitation(
        &self,
        _at: Coordinates,
    ) -> Result<PrecipitationRecord, SourceError> {
        Err(SourceError::Status {
            domain: EnvironmentDomain::Precipitation,
            status: 404,
        })
    }

    async fn reverse_geocode(&self, _at: Coordinates) -> Result<Option<String>, SourceError> {
        Err(SourceError::Geocoding {
            reason: "unreachable".to_owned(),
        })
    }
}

/// Every domain answers with a fixed genuine record and counts calls.
#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
}

impl EnvironmentSource for CountingSource {
    async fn fetch_weather(&self, _at: Coordinates) -> Result<WeatherRecord, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(genuine_weather())
    }

    async fn fetch_soil(&self, _at: Coordinates) -> Result<SoilRecord, SourceError> {
        Ok(genuine_soil())
    }

    async fn fetch_vegetation(&self, _at: Coordinates) -> Result<VegetationRecord, SourceError> {
        Ok(genuine_vegetation())
    }

    async fn fetch_precipitation(
        &self,
        _at: Coordinates,
    ) -> Result<PrecipitationRecord, SourceError> {
        Ok(genuine_precipitation())
    }

    async fn reverse_geocode(&self, _at: Coordinates) -> Result<Option<String>, SourceError> {
        Ok(Some("Ames, Story County, Iowa".to_owned()))
    }
}

/// Weather hangs far past the deadline; everything else is genuine.
struct SlowWeatherSource;

impl EnvironmentSource for SlowWeatherSource {
    async fn fetch_weather(&self, _at: Coordinates) -> Result<WeatherRecord, SourceError> {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Ok(genuine_weather())
    }

    async fn fetch_soil(&self, _at: Coordinates) -> Result<SoilRecord, SourceError> {
        Ok(genuine_soil())
    }

    async fn fetch_vegetation(&self, _at: Coordinates) -> Result<VegetationRecord, SourceError> {
        Ok(genuine_vegetation())
    }

    async fn fetch_precipitation(
        &self,
        _at: Coordinates,
    ) -> Result<PrecipitationRecord, SourceError> {
        Ok(genuine_precipitation())
    }

    async fn reverse_geocode(&self, _at: Coordinates) -> Result<Option<String>, SourceError> {
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn all_sources_failing_still_yields_four_domains() {
    let aggregator = EnvironmentAggregator::new(FailingSource, &AggregatorConfig::default());
    let snapshot = aggregator.fetch_environment(IOWA).await;

    assert_eq!(snapshot.provenance.weather, Provenance::Synthetic);
    assert_eq!(snapshot.provenance.soil, Provenance::Synthetic);
    assert_eq!(snapshot.provenance.vegetation, Provenance::Synthetic);
    assert_eq!(snapshot.provenance.precipitation, Provenance::Synthetic);
    assert!(snapshot.weather.source.starts_with("Synthetic"));
    assert!((0.1..=0.9).contains(&snapshot.vegetation.ndvi));
    assert!(snapshot.precipitation.daily >= 0.0);

    assert_eq!(snapshot.location.provenance, Provenance::Synthetic);
    assert_eq!(snapshot.location.name, "Northern Mid-latitudes, Americas");
    assert_eq!(snapshot.coordinates, IOWA);
}

#[tokio::test]
async fn genuine_records_are_kept_and_tagged() {
    let aggregator =
        EnvironmentAggregator::new(CountingSource::default(), &AggregatorConfig::default());
    let snapshot = aggregator.fetch_environment(IOWA).await;

    assert_eq!(snapshot.provenance.genuine_count(), 4);
    assert_eq!(snapshot.weather, genuine_weather());
    assert_eq!(snapshot.vegetation.ndvi, 0.35);
    assert_eq!(snapshot.location.name, "Ames, Story County, Iowa");
    assert_eq!(snapshot.location.provenance, Provenance::Genuine);
}

#[tokio::test]
async fn fresh_cache_hit_skips_the_source() {
    let aggregator =
        EnvironmentAggregator::new(CountingSource::default(), &AggregatorConfig::default());

    let first = aggregator.fetch_environment(IOWA).await;
    // Same rounding cell at the default precision.
    let second = aggregator
        .fetch_environment(Coordinates::new(42.0311, -93.6322))
        .await;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(aggregator.source().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn expired_entry_is_refetched() {
    let config = AggregatorConfig {
        cache_ttl_secs: 60,
        ..AggregatorConfig::default()
    };
    let aggregator = EnvironmentAggregator::new(CountingSource::default(), &config);

    aggregator.fetch_environment(IOWA).await;
    tokio::time::advance(Duration::from_secs(30)).await;
    aggregator.fetch_environment(IOWA).await;
    assert_eq!(aggregator.source().calls.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(31)).await;
    aggregator.fetch_environment(IOWA).await;
    assert_eq!(aggregator.source().calls.load(Ordering::SeqCst), 2);
    assert_eq!(aggregator.cached_snapshots().await, 1);
}

#[tokio::test(start_paused = true)]
async fn slow_domain_times_out_without_tainting_others() {
    let config = AggregatorConfig {
        fetch_timeout_ms: 5_000,
        ..AggregatorConfig::default()
    };
    let aggregator = EnvironmentAggregator::new(SlowWeatherSource, &config);

    let started = tokio::time::Instant::now();
    let snapshot = aggregator.fetch_environment(IOWA).await;
    let elapsed = started.elapsed();

    assert_eq!(snapshot.provenance.weather, Provenance::Synthetic);
    assert_eq!(snapshot.provenance.soil, Provenance::Genuine);
    assert_eq!(snapshot.provenance.vegetation, Provenance::Genuine);
    assert_eq!(snapshot.provenance.precipitation, Provenance::Genuine);
    assert_eq!(snapshot.soil, genuine_soil());

    // Bounded by the per-domain deadline, not the ten-minute sleep.
    assert!(elapsed >= Duration::from_secs(5));
    assert!(elapsed < Duration::from_secs(60));
}

#[tokio::test]
async fn concurrent_callers_all_receive_snapshots() {
    let aggregator = Arc::new(EnvironmentAggregator::new(
        FailingSource,
        &AggregatorConfig::default(),
    ));

    let mut handles = Vec::new();
    for i in 0_u32..8 {
        let aggregator = Arc::clone(&aggregator);
        handles.push(tokio::spawn(async move {
            let lat = 30.0 + f64::from(i);
            aggregator.fetch_environment(Coordinates::new(lat, 10.0)).await
        }));
    }

    for handle in handles {
        let snapshot = handle.await.unwrap();
        assert_eq!(snapshot.provenance.genuine_count(), 0);
    }
    assert_eq!(aggregator.cached_snapshots().await, 8);
}
