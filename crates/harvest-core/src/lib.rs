//! Farm simulation engine for Harvest.
//!
//! This crate owns the game rules and the loop that applies them:
//!
//! - [`clock`] -- In-game day counter and derived season
//! - [`catalog`] -- Crop, farm location, and weather event tables
//! - [`config`] -- Configuration loading from `harvest-config.yaml`
//! - [`state`] -- Initial farm state
//! - [`growth`] -- Per-plot growth, stress, and soil drift
//! - [`actions`] -- Player action validation and effects
//! - [`sustainability`] -- Derived sustainability metrics
//! - [`tick`] -- One daily tick over the whole farm
//! - [`engine`] -- Shared state with serialized mutation
//! - [`runner`] -- Periodic tick loop with clean shutdown

pub mod actions;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod growth;
pub mod runner;
pub mod state;
pub mod sustainability;
pub mod tick;

pub use catalog::{CropCatalog, LocationCatalog};
pub use clock::{ClockError, FarmClock};
pub use config::{ConfigError, HarvestConfig, LogFormat};
pub use engine::{ActionRejected, FarmEngine};
pub use runner::{RunEndReason, RunOptions, RunResult, RunnerError, TickCallback, run_farm};
pub use tick::{TickError, TickSummary};
