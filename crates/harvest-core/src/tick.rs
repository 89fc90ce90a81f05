//! One daily tick of the farm.
//!
//! A tick advances the clock by one day, recomputes every planted plot
//! against the latest environmental snapshot, and stamps the state. Plot
//! faults are logged and skipped so one bad plot never stalls the farm.

use chrono::{DateTime, Utc};
use harvest_types::{EnvironmentalSnapshot, GameState, Season};
use tracing::warn;

use crate::catalog::CropCatalog;
use crate::clock::{ClockError, FarmClock};
use crate::growth::{self, StressInputs};

/// Errors that abort a tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Summary of a completed tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The day the farm advanced to.
    pub day: u32,
    /// Season for that day.
    pub season: Season,
    /// Plots with a crop that were recomputed.
    pub plots_updated: usize,
    /// Plots skipped because of a fault.
    pub plots_skipped: usize,
    /// Plot ids whose crop matured on this tick.
    pub newly_mature: Vec<usize>,
    /// Whether temperature stress was skipped (synthetic weather).
    pub temperature_gated: bool,
    /// Whether vegetation stress was skipped (synthetic vegetation).
    pub ndvi_gated: bool,
    /// Place name of the snapshot used.
    pub location: String,
    /// How many of the four domains carried genuine data.
    pub genuine_domains: usize,
}

/// Advance `state` by one day using `snapshot`.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the day counter would overflow or
/// `days_per_season` is zero. The state is not modified in that case.
pub fn run_tick(
    state: &mut GameState,
    crops: &CropCatalog,
    days_per_season: u32,
    snapshot: &EnvironmentalSnapshot,
    now: DateTime<Utc>,
) -> Result<TickSummary, TickError> {
    let mut clock = FarmClock::from_parts(state.day, days_per_season)?;
    let day = clock.advance()?;
    let season = clock.season();
    state.day = day;
    state.season = season;

    let stress = StressInputs::from_snapshot(snapshot);
    let mut summary = TickSummary {
        day,
        season,
        plots_updated: 0,
        plots_skipped: 0,
        newly_mature: Vec::new(),
        temperature_gated: stress.temperature.is_none(),
        ndvi_gated: stress.ndvi.is_none(),
        location: snapshot.location.name.clone(),
        genuine_domains: snapshot.provenance.genuine_count(),
    };

    for plot in &mut state.plots {
        match growth::update_plot(plot, crops, day, stress) {
            Ok(outcome) => {
                if outcome.updated {
                    summary.plots_updated = summary.plots_updated.saturating_add(1);
                }
                if outcome.newly_mature {
                    summary.newly_mature.push(plot.id);
                }
            }
            Err(error) => {
                warn!(plot_id = plot.id, %error, "skipping plot this tick");
                summary.plots_skipped = summary.plots_skipped.saturating_add(1);
            }
        }
    }

    state.last_updated = now;
    Ok(summary)
}
