//! Environmental data aggregation for the Harvest farm simulation.
//!
//! The aggregator gathers weather, soil, vegetation, and precipitation data
//! for a coordinate. Each domain is fetched concurrently from an external
//! source under its own timeout; any failure is replaced locally by the
//! deterministic synthetic generator so a snapshot is always produced.
//!
//! # Modules
//!
//! - [`aggregator`] -- [`EnvironmentAggregator`]: cache lookup, concurrent
//!   fetch-or-synthesize, provenance tagging, cache population.
//! - [`cache`] -- [`TtlCache`], a read-through freshness cache.
//! - [`config`] -- Aggregator and source endpoint configuration.
//! - [`error`] -- [`SourceError`] for external source failures.
//! - [`http`] -- [`HttpEnvironmentSource`], the `reqwest`-backed source.
//! - [`location`] -- Coarse region-band naming for coordinates.
//! - [`solar`] -- Simplified solar radiation model.
//! - [`source`] -- The [`EnvironmentSource`] capability trait and the
//!   [`OfflineSource`] that always defers to the synthetic generator.
//! - [`synthetic`] -- [`SyntheticGenerator`], the offline environment model.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod location;
pub mod solar;
pub mod source;
pub mod synthetic;

pub use aggregator::{CoordinateKey, EnvironmentAggregator};
pub use cache::TtlCache;
pub use config::{AggregatorConfig, SourcesConfig};
pub use error::SourceError;
pub use http::HttpEnvironmentSource;
pub use source::{EnvironmentSource, OfflineSource};
pub use synthetic::{SyntheticEnvironment, SyntheticGenerator};
