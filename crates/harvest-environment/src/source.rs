//! The capability interface for external environmental data.
//!
//! The aggregator is generic over [`EnvironmentSource`] so production code
//! talks HTTP through [`HttpEnvironmentSource`](crate::HttpEnvironmentSource)
//! while tests substitute scripted fakes.

use std::future::Future;

use harvest_types::{
    Coordinates, EnvironmentDomain, PrecipitationRecord, SoilRecord, VegetationRecord,
    WeatherRecord,
};

use crate::error::SourceError;

/// Fetches genuine records for each environmental domain.
///
/// Implementations do not need to enforce deadlines; the aggregator wraps
/// every call in its own timeout.
pub trait EnvironmentSource: Send + Sync + 'static {
    /// Current weather at a coordinate.
    fn fetch_weather(
        &self,
        at: Coordinates,
    ) -> impl Future<Output = Result<WeatherRecord, SourceError>> + Send;

    /// Current soil conditions at a coordinate.
    fn fetch_soil(
        &self,
        at: Coordinates,
    ) -> impl Future<Output = Result<SoilRecord, SourceError>> + Send;

    /// Latest vegetation indices at a coordinate.
    fn fetch_vegetation(
        &self,
        at: Coordinates,
    ) -> impl Future<Output = Result<VegetationRecord, SourceError>> + Send;

    /// Recent precipitation totals at a coordinate.
    fn fetch_precipitation(
        &self,
        at: Coordinates,
    ) -> impl Future<Output = Result<PrecipitationRecord, SourceError>> + Send;

    /// Human-readable place name, or `None` if the coordinate has none.
    fn reverse_geocode(
        &self,
        at: Coordinates,
    ) -> impl Future<Output = Result<Option<String>, SourceError>> + Send;
}

/// A source with nothing configured. Every domain is synthesized.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl EnvironmentSource for OfflineSource {
    async fn fetch_weather(&self, _at: Coordinates) -> Result<WeatherRecord, SourceError> {
        Err(SourceError::NotConfigured {
            domain: EnvironmentDomain::Weather,
        })
    }

    async fn fetch_soil(&self, _at: Coordinates) -> Result<SoilRecord, SourceError> {
        Err(SourceError::NotConfigured {
            domain: EnvironmentDomain::Soil,
        })
    }

    async fn fetch_vegetation(&self, _at: Coordinates) -> Result<VegetationRecord, SourceError> {
        Err(SourceError::NotConfigured {
            domain: EnvironmentDomain::Vegetation,
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
        Ok(None)
    }
}
