//! Cache-fronted, concurrent, fail-soft environment aggregation.
//!
//! # Flow
//!
//! 1. Round the coordinate into a [`CoordinateKey`]. A fresh cache hit is
//!    returned unchanged.
//! 2. On a miss, spawn one task per domain. Each task calls the source
//!    under its own deadline, so a slow domain cannot starve a fast one.
//! 3. Join all four. Any failed domain is replaced by the synthetic record
//!    for the same coordinate and time, and tagged synthetic.
//! 4. Resolve a place name (reverse geocoding, else a region band), stamp
//!    the capture time, cache, and return.
//!
//! [`EnvironmentAggregator::fetch_environment`] never fails.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use harvest_types::{
    Coordinates, EnvironmentDomain, EnvironmentalSnapshot, Provenance, ProvenanceTags,
    ResolvedLocation,
};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::config::AggregatorConfig;
use crate::error::SourceError;
use crate::location::region_band;
use crate::source::EnvironmentSource;
use crate::synthetic::SyntheticGenerator;

/// Largest supported number of decimal places in a cache key.
const MAX_KEY_PRECISION: u32 = 9;

/// A coordinate rounded to a fixed number of decimal places.
///
/// Two requests within the same rounding cell share one cached snapshot.
/// At the default precision of 2 the cell is roughly one kilometre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateKey {
    lat: i64,
    lon: i64,
}

impl CoordinateKey {
    /// Round `at` to `precision` decimal places (capped at 9).
    pub fn new(at: Coordinates, precision: u32) -> Self {
        let exponent = i32::try_from(precision.min(MAX_KEY_PRECISION)).unwrap_or(2);
        let scale = 10_f64.powi(exponent);
        Self {
            lat: scaled(at.lat, scale),
            lon: scaled(at.lon, scale),
        }
    }
}

/// Scale and round a degree value to an integer cell index.
#[allow(clippy::cast_possible_truncation)]
fn scaled(degrees: f64, scale: f64) -> i64 {
    // Degrees are bounded by 180, so 180e9 fits comfortably in an i64.
    (degrees.clamp(-180.0, 180.0) * scale).round() as i64
}

/// Produces [`EnvironmentalSnapshot`]s for coordinates.
///
/// Generic over the source so tests can inject deterministic fakes. The
/// source is shared with the per-domain fetch tasks through an [`Arc`].
pub struct EnvironmentAggregator<S> {
    source: Arc<S>,
    cache: TtlCache<CoordinateKey, Arc<EnvironmentalSnapshot>>,
    generator: SyntheticGenerator,
    config: AggregatorConfig,
}

impl<S: EnvironmentSource> EnvironmentAggregator<S> {
    /// Create an aggregator with an empty cache.
    pub fn new(source: S, config: &AggregatorConfig) -> Self {
        Self {
            source: Arc::new(source),
            cache: TtlCache::new(),
            generator: SyntheticGenerator::new(config.synthetic_seed),
            config: config.clone(),
        }
    }

    /// The active configuration.
    pub const fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of snapshots held in the cache, fresh or stale.
    pub async fn cached_snapshots(&self) -> usize {
        self.cache.len().await
    }

    /// Return the environment at `at`, from cache when fresh.
    ///
    /// Always yields all four domains; failed sources are synthesized.
    pub async fn fetch_environment(&self, at: Coordinates) -> Arc<EnvironmentalSnapshot> {
        let key = CoordinateKey::new(at, self.config.key_precision);

        if let Some(snapshot) = self.cache.get(&key, self.config.cache_ttl()).await {
            debug!(lat = at.lat, lon = at.lon, "environment cache hit");
            return snapshot;
        }

        let snapshot = Arc::new(self.assemble(at, Utc::now()).await);
        info!(
            lat = at.lat,
            lon = at.lon,
            location = %snapshot.location.name,
            genuine_domains = snapshot.provenance.genuine_count(),
            "environment snapshot assembled"
        );

        self.cache.set(key, Arc::clone(&snapshot)).await;
        snapshot
    }

    /// Fetch or synthesize every domain and build a snapshot.
    async fn assemble(&self, at: Coordinates, now: DateTime<Utc>) -> EnvironmentalSnapshot {
        let synthetic = self.generator.generate(at, now);

        if self.config.offline {
            return EnvironmentalSnapshot {
                weather: synthetic.weather,
                soil: synthetic.soil,
                vegetation: synthetic.vegetation,
                precipitation: synthetic.precipitation,
                coordinates: at,
                location: ResolvedLocation {
                    name: region_band(at),
                    provenance: Provenance::Synthetic,
                },
                captured_at: now,
                provenance: ProvenanceTags::ALL_SYNTHETIC,
            };
        }

        let limit = self.config.fetch_timeout();

        let weather = {
            let source = Arc::clone(&self.source);
            spawn_fetch(EnvironmentDomain::Weather, limit, async move {
                source.fetch_weather(at).await
            })
        };
        let soil = {
            let source = Arc::clone(&self.source);
            spawn_fetch(EnvironmentDomain::Soil, limit, async move {
                source.fetch_soil(at).await
            })
        };
        let vegetation = {
            let source = Arc::clone(&self.source);
            spawn_fetch(EnvironmentDomain::Vegetation, limit, async move {
                source.fetch_vegetation(at).await
            })
        };
        let precipitation = {
            let source = Arc::clone(&self.source);
            spawn_fetch(EnvironmentDomain::Precipitation, limit, async move {
                source.fetch_precipitation(at).await
            })
        };

        let (weather, soil, vegetation, precipitation) =
            tokio::join!(weather, soil, vegetation, precipitation);

        let (weather, weather_tag) = settle(EnvironmentDomain::Weather, weather, synthetic.weather);
        let (soil, soil_tag) = settle(EnvironmentDomain::Soil, soil, synthetic.soil);
        let (vegetation, vegetation_tag) =
            settle(EnvironmentDomain::Vegetation, vegetation, synthetic.vegetation);
        let (precipitation, precipitation_tag) = settle(
            EnvironmentDomain::Precipitation,
            precipitation,
            synthetic.precipitation,
        );

        let location = self.resolve_location(at, limit).await;

        EnvironmentalSnapshot {
            weather,
            soil,
            vegetation,
            precipitation,
            coordinates: at,
            location,
            captured_at: Utc::now(),
            provenance: ProvenanceTags {
                weather: weather_tag,
                soil: soil_tag,
                vegetation: vegetation_tag,
                precipitation: precipitation_tag,
            },
        }
    }

    /// Reverse-geocode under the fetch deadline, else name the region band.
    async fn resolve_location(&self, at: Coordinates, limit: Duration) -> ResolvedLocation {
        let fallback = || ResolvedLocation {
            name: region_band(at),
            provenance: Provenance::Synthetic,
        };

        match tokio::time::timeout(limit, self.source.reverse_geocode(at)).await {
            Ok(Ok(Some(name))) => ResolvedLocation {
                name,
                provenance: Provenance::Genuine,
            },
            Ok(Ok(None)) => fallback(),
            Ok(Err(error)) => {
                warn!(%error, "reverse geocoding failed, using region band");
                fallback()
            }
            Err(_elapsed) => {
                warn!(
                    limit_ms = millis(limit),
                    "reverse geocoding timed out, using region band"
                );
                fallback()
            }
        }
    }
}

/// Run one domain fetch on its own task under `limit`.
fn spawn_fetch<T, F>(
    domain: EnvironmentDomain,
    limit: Duration,
    fetch: F,
) -> JoinHandle<Result<T, SourceError>>
where
    T: Send + 'static,
    F: Future<Output = Result<T, SourceError>> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::timeout(limit, fetch)
            .await
            .unwrap_or_else(|_elapsed| {
                Err(SourceError::Timeout {
                    domain,
                    limit_ms: millis(limit),
                })
            })
    })
}

/// Keep a genuine record or substitute the synthetic one.
fn settle<T>(
    domain: EnvironmentDomain,
    joined: Result<Result<T, SourceError>, JoinError>,
    synthetic: T,
) -> (T, Provenance) {
    let error = match joined {
        Ok(Ok(record)) => return (record, Provenance::Genuine),
        Ok(Err(error)) => error,
        Err(join_error) => SourceError::TaskFailed {
            domain,
            reason: join_error.to_string(),
        },
    };

    if matches!(error, SourceError::NotConfigured { .. }) {
        debug!(%domain, %error, "source not configured, synthesizing");
    } else {
        warn!(%domain, %error, "source failed, synthesizing");
    }
    (synthetic, Provenance::Synthetic)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::OfflineSource;

    #[test]
    fn nearby_coordinates_share_a_key() {
        let a = CoordinateKey::new(Coordinates::new(42.0308, -93.6319), 2);
        let b = CoordinateKey::new(Coordinates::new(42.0321, -93.6288), 2);
        let c = CoordinateKey::new(Coordinates::new(42.0408, -93.6319), 2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn precision_is_capped() {
        let at = Coordinates::new(42.123_456_789_1, -93.0);
        assert_eq!(CoordinateKey::new(at, 9), CoordinateKey::new(at, 40));
    }

    #[tokio::test]
    async fn offline_mode_is_fully_synthetic() {
        let config = AggregatorConfig {
            offline: true,
            ..AggregatorConfig::default()
        };
        let aggregator = EnvironmentAggregator::new(OfflineSource, &config);
        let snapshot = aggregator
            .fetch_environment(Coordinates::new(36.78, -119.42))
            .await;

        assert_eq!(snapshot.provenance, ProvenanceTags::ALL_SYNTHETIC);
        assert_eq!(snapshot.location.name, "Northern Mid-latitudes, Americas");
        assert_eq!(aggregator.cached_snapshots().await, 1);
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let aggregator = EnvironmentAggregator::new(OfflineSource, &AggregatorConfig::default());
        let at = Coordinates::new(41.13, -98.27);

        let first = aggregator.fetch_environment(at).await;
        let second = aggregator.fetch_environment(at).await;
        assert!(Arc::ptr_eq(&first, &second));
    }
}
