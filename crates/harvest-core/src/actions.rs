//! Player action validation and application.
//!
//! Every action follows the same contract: all preconditions are checked
//! before any field is written, so a rejected action leaves the state
//! exactly as it was. Successful actions stamp `last_updated`.
//!
//! | action                | cost        | effect                                            |
//! |-----------------------|-------------|---------------------------------------------------|
//! | plant                 | crop cost   | sets crop and planted day                         |
//! | irrigate              | 20          | moisture +0.3, score +10, water usage +100        |
//! | fertilize             | 30          | fertility +0.2, score +15, carbon footprint +0.5  |
//! | harvest               | --          | budget +2x yield, score +yield, plot reset        |
//! | rotateToLegume        | --          | fertility +0.3, sustainability +5                 |
//! | installDripIrrigation | 200         | sustainability +10                                |
//! | feedLivestock         | 10 per head | herd health +0.1                                  |
//! | waterLivestock        | 5 per head  | herd productivity +0.05                           |

use chrono::{DateTime, Utc};
use harvest_types::{Action, GameState, GrowthStage, Livestock, Plot, RejectionReason};

use crate::catalog::CropCatalog;
use crate::growth::crop_yield;

/// Cost of one irrigation.
pub const IRRIGATION_COST: i64 = 20;

/// Cost of one fertilizer application.
pub const FERTILIZER_COST: i64 = 30;

/// Cost of installing drip irrigation.
pub const DRIP_IRRIGATION_COST: i64 = 200;

/// Feed cost per animal.
pub const FEED_COST_PER_HEAD: i64 = 10;

/// Water cost per animal.
pub const WATER_COST_PER_HEAD: i64 = 5;

/// Budget earned per unit of harvested yield.
pub const REVENUE_PER_YIELD: i64 = 2;

/// Validate and apply `action` to `state`.
///
/// # Errors
///
/// Returns the [`RejectionReason`] of the first failed precondition. The
/// state is not modified on rejection.
pub fn apply_action(
    state: &mut GameState,
    action: &Action,
    crops: &CropCatalog,
    now: DateTime<Utc>,
) -> Result<(), RejectionReason> {
    match action {
        Action::Plant { plot_id, crop } => plant(state, *plot_id, crop, crops)?,
        Action::Irrigate { plot_id } => irrigate(state, *plot_id)?,
        Action::Fertilize { plot_id } => fertilize(state, *plot_id)?,
        Action::Harvest { plot_id } => harvest(state, *plot_id, crops)?,
        Action::RotateToLegume { plot_id } => rotate_to_legume(state, *plot_id)?,
        Action::InstallDripIrrigation => install_drip_irrigation(state)?,
        Action::FeedLivestock { kind, count } => feed_livestock(state, kind, *count)?,
        Action::WaterLivestock { kind, count } => water_livestock(state, kind, *count)?,
    }
    state.last_updated = now;
    Ok(())
}

// ---------------------------------------------------------------------------
// Plot actions
// ---------------------------------------------------------------------------

fn plant(
    state: &mut GameState,
    plot_id: usize,
    crop_id: &str,
    crops: &CropCatalog,
) -> Result<(), RejectionReason> {
    let crop = crops.get(crop_id).ok_or_else(|| RejectionReason::UnknownCrop {
        crop: crop_id.to_owned(),
    })?;
    let day = state.day;
    let budget = state.budget;

    let plot = plot_mut(&mut state.plots, plot_id)?;
    if plot.is_planted() {
        return Err(RejectionReason::PlotOccupied { plot_id });
    }
    ensure_budget(budget, crop.cost)?;

    plot.crop = Some(crop.id.clone());
    plot.planted_day = day;
    plot.growth_progress = 0.0;
    plot.growth_stage = GrowthStage::from_progress(0.0);
    plot.yield_amount = 0;
    state.budget = budget.saturating_sub(crop.cost);
    Ok(())
}

fn irrigate(state: &mut GameState, plot_id: usize) -> Result<(), RejectionReason> {
    let budget = state.budget;
    let plot = plot_mut(&mut state.plots, plot_id)?;
    ensure_budget(budget, IRRIGATION_COST)?;

    plot.soil_moisture = (plot.soil_moisture + 0.3).min(1.0);
    plot.needs_water = false;
    state.budget = budget.saturating_sub(IRRIGATION_COST);
    state.score = state.score.saturating_add(10);
    state.water_usage += 100.0;
    Ok(())
}

fn fertilize(state: &mut GameState, plot_id: usize) -> Result<(), RejectionReason> {
    let budget = state.budget;
    let plot = plot_mut(&mut state.plots, plot_id)?;
    ensure_budget(budget, FERTILIZER_COST)?;

    plot.fertility = (plot.fertility + 0.2).min(1.0);
    plot.needs_fertilizer = false;
    state.budget = budget.saturating_sub(FERTILIZER_COST);
    state.score = state.score.saturating_add(15);
    state.carbon_footprint += 0.5;
    Ok(())
}

fn harvest(
    state: &mut GameState,
    plot_id: usize,
    crops: &CropCatalog,
) -> Result<(), RejectionReason> {
    let plot = plot_mut(&mut state.plots, plot_id)?;
    if plot.growth_stage != GrowthStage::Mature {
        return Err(RejectionReason::NotMature {
            plot_id,
            stage: plot.growth_stage,
        });
    }
    let crop_id = plot.crop.as_deref().unwrap_or_default();
    let crop = crops.get(crop_id).ok_or_else(|| RejectionReason::UnknownCrop {
        crop: crop_id.to_owned(),
    })?;

    let harvested = i64::from(crop_yield(crop.base_yield, plot.health, plot.fertility));
    plot.reset_to_empty();

    state.budget = state
        .budget
        .saturating_add(harvested.saturating_mul(REVENUE_PER_YIELD));
    state.score = state.score.saturating_add(harvested);
    Ok(())
}

fn rotate_to_legume(state: &mut GameState, plot_id: usize) -> Result<(), RejectionReason> {
    let plot = plot_mut(&mut state.plots, plot_id)?;
    if plot.is_planted() {
        return Err(RejectionReason::PlotOccupied { plot_id });
    }

    // Legumes fix nitrogen.
    plot.fertility = (plot.fertility + 0.3).min(1.0);
    state.sustainability_score = state.sustainability_score.saturating_add(5);
    Ok(())
}

fn install_drip_irrigation(state: &mut GameState) -> Result<(), RejectionReason> {
    ensure_budget(state.budget, DRIP_IRRIGATION_COST)?;

    // TODO: halve irrigation water usage once a farm has drip irrigation;
    // that needs an installed flag on GameState.
    state.budget = state.budget.saturating_sub(DRIP_IRRIGATION_COST);
    state.sustainability_score = state.sustainability_score.saturating_add(10);
    Ok(())
}

// ---------------------------------------------------------------------------
// Livestock actions
// ---------------------------------------------------------------------------

fn feed_livestock(state: &mut GameState, kind: &str, count: u32) -> Result<(), RejectionReason> {
    let cost = herd_cost(count, FEED_COST_PER_HEAD)?;
    let budget = state.budget;
    let herd = herd_mut(&mut state.livestock, kind)?;
    ensure_budget(budget, cost)?;

    herd.health = (herd.health + 0.1).min(1.0);
    state.budget = budget.saturating_sub(cost);
    Ok(())
}

fn water_livestock(state: &mut GameState, kind: &str, count: u32) -> Result<(), RejectionReason> {
    let cost = herd_cost(count, WATER_COST_PER_HEAD)?;
    let budget = state.budget;
    let herd = herd_mut(&mut state.livestock, kind)?;
    ensure_budget(budget, cost)?;

    herd.productivity = (herd.productivity + 0.05).min(1.0);
    state.budget = budget.saturating_sub(cost);
    Ok(())
}

// ---------------------------------------------------------------------------
// Precondition helpers
// ---------------------------------------------------------------------------

fn plot_mut(plots: &mut [Plot], plot_id: usize) -> Result<&mut Plot, RejectionReason> {
    plots
        .get_mut(plot_id)
        .ok_or(RejectionReason::UnknownPlot { plot_id })
}

fn herd_mut<'a>(
    livestock: &'a mut [Livestock],
    kind: &str,
) -> Result<&'a mut Livestock, RejectionReason> {
    livestock
        .iter_mut()
        .find(|herd| herd.kind == kind)
        .ok_or_else(|| RejectionReason::UnknownLivestock {
            kind: kind.to_owned(),
        })
}

const fn ensure_budget(available: i64, required: i64) -> Result<(), RejectionReason> {
    if available < required {
        return Err(RejectionReason::InsufficientBudget {
            required,
            available,
        });
    }
    Ok(())
}

fn herd_cost(count: u32, per_head: i64) -> Result<i64, RejectionReason> {
    if count == 0 {
        return Err(RejectionReason::InvalidCount);
    }
    Ok(i64::from(count).saturating_mul(per_head))
}
