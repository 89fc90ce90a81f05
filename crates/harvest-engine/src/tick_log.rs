//! Tick callback that reports each day's environment and growth.

use harvest_core::{TickCallback, TickSummary};
use tracing::info;

/// Logs one summary line per tick.
#[derive(Debug, Default)]
pub struct TickLogger {
    matured_total: usize,
}

impl TickLogger {
    /// Create a logger with no history.
    pub const fn new() -> Self {
        Self { matured_total: 0 }
    }
}

impl TickCallback for TickLogger {
    fn on_tick(&mut self, summary: &TickSummary) {
        self.matured_total = self.matured_total.saturating_add(summary.newly_mature.len());

        info!(
            day = summary.day,
            season = ?summary.season,
            location = %summary.location,
            genuine_domains = summary.genuine_domains,
            temperature_gated = summary.temperature_gated,
            ndvi_gated = summary.ndvi_gated,
            "environment refreshed"
        );
        info!(
            day = summary.day,
            plots_updated = summary.plots_updated,
            plots_skipped = summary.plots_skipped,
            newly_mature = ?summary.newly_mature,
            matured_total = self.matured_total,
            "tick complete"
        );
    }
}
