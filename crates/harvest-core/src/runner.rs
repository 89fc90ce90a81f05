//! Periodic tick loop.
//!
//! [`run_farm`] drives [`FarmEngine::tick`] on a fixed interval until a
//! shutdown signal arrives or an optional tick limit is reached. The first
//! tick fires one full interval after start.
//!
//! [`FarmEngine::tick`]: crate::engine::FarmEngine::tick

use std::time::Duration;

use harvest_environment::EnvironmentSource;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::engine::FarmEngine;
use crate::tick::{TickError, TickSummary};

/// Errors that can occur during the run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// The shutdown signal fired (or its sender was dropped).
    Shutdown,
    /// The configured tick limit was reached.
    TickLimit,
}

/// Result of a run.
#[derive(Debug)]
pub struct RunResult {
    /// Why the loop ended.
    pub end_reason: RunEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary) {}
}

/// Loop timing and bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Time between ticks.
    pub interval: Duration,
    /// Stop after this many ticks. `None` runs until shutdown.
    pub max_ticks: Option<u64>,
}

/// Run the tick loop until shutdown or the tick limit.
///
/// # Errors
///
/// Returns [`RunnerError::Tick`] if a tick fails; the loop stops there.
pub async fn run_farm<S, C>(
    engine: &FarmEngine<S>,
    options: RunOptions,
    mut shutdown: watch::Receiver<bool>,
    callback: &mut C,
) -> Result<RunResult, RunnerError>
where
    S: EnvironmentSource,
    C: TickCallback,
{
    let mut interval = tokio::time::interval_at(
        tokio::time::Instant::now()
            .checked_add(options.interval)
            .unwrap_or_else(tokio::time::Instant::now),
        options.interval,
    );
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut total_ticks: u64 = 0;
    let mut final_summary = None;

    info!(
        interval = ?options.interval,
        max_ticks = ?options.max_ticks,
        "farm loop starting"
    );

    let end_reason = loop {
        if options.max_ticks.is_some_and(|max| total_ticks >= max) {
            break RunEndReason::TickLimit;
        }
        if *shutdown.borrow() {
            break RunEndReason::Shutdown;
        }

        tokio::select! {
            _ = interval.tick() => {
                let summary = engine.tick().await?;
                total_ticks = total_ticks.saturating_add(1);
                callback.on_tick(&summary);
                final_summary = Some(summary);
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break RunEndReason::Shutdown;
                }
            }
        }
    };

    info!(total_ticks, reason = ?end_reason, "farm loop stopped");

    Ok(RunResult {
        end_reason,
        final_summary,
        total_ticks,
    })
}
