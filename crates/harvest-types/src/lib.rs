//! Shared type definitions for the Harvest farm simulation.
//!
//! This crate is the single source of truth for the data model shared by
//! the environment aggregator, the farm engine, and the dashboard. Types
//! flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`enums`] -- Seasons, growth stages, provenance, and classification enums
//! - [`environment`] -- Coordinates, per-domain environmental records, and
//!   the aggregated [`EnvironmentalSnapshot`]
//! - [`farm`] -- Crops, plots, livestock, catalogs, and the [`GameState`]
//! - [`actions`] -- Player actions and typed rejection reasons

pub mod actions;
pub mod enums;
pub mod environment;
pub mod farm;

// Re-export all public types at crate root for convenience.
pub use actions::{Action, RejectionReason};
pub use enums::{
    ClimateBand, EnvironmentDomain, GrowthStage, PrecipitationKind, Provenance, Season,
    VegetationHealth,
};
pub use environment::{
    Coordinates, EnvironmentalSnapshot, PrecipitationRecord, ProvenanceTags, ResolvedLocation,
    SoilRecord, VegetationRecord, WeatherRecord,
};
pub use farm::{
    Crop, FarmLocation, GameState, Livestock, Plot, SustainabilityReport, WeatherEvent,
};
