//! Player actions and the reasons they can be rejected.
//!
//! Actions arrive from the dashboard as JSON tagged by an `action` field,
//! e.g. `{"action": "plant", "plotId": 0, "crop": "corn"}`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::GrowthStage;

/// A player-initiated mutation of the game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "action", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum Action {
    /// Plant a crop on an empty plot.
    Plant {
        /// Target plot.
        #[serde(rename = "plotId")]
        plot_id: usize,
        /// Catalog key of the crop.
        crop: String,
    },
    /// Water a plot.
    Irrigate {
        /// Target plot.
        #[serde(rename = "plotId")]
        plot_id: usize,
    },
    /// Fertilize a plot.
    Fertilize {
        /// Target plot.
        #[serde(rename = "plotId")]
        plot_id: usize,
    },
    /// Harvest a mature crop.
    Harvest {
        /// Target plot.
        #[serde(rename = "plotId")]
        plot_id: usize,
    },
    /// Grow a nitrogen-fixing legume cover on an empty plot.
    RotateToLegume {
        /// Target plot.
        #[serde(rename = "plotId")]
        plot_id: usize,
    },
    /// Install farm-wide drip irrigation.
    InstallDripIrrigation,
    /// Feed part of a herd.
    FeedLivestock {
        /// Livestock kind (e.g. `cattle`).
        kind: String,
        /// Number of animals fed.
        count: u32,
    },
    /// Water part of a herd.
    WaterLivestock {
        /// Livestock kind (e.g. `cattle`).
        kind: String,
        /// Number of animals watered.
        count: u32,
    },
}

impl Action {
    /// Short name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Plant { .. } => "plant",
            Self::Irrigate { .. } => "irrigate",
            Self::Fertilize { .. } => "fertilize",
            Self::Harvest { .. } => "harvest",
            Self::RotateToLegume { .. } => "rotateToLegume",
            Self::InstallDripIrrigation => "installDripIrrigation",
            Self::FeedLivestock { .. } => "feedLivestock",
            Self::WaterLivestock { .. } => "waterLivestock",
        }
    }
}

/// Why an action was rejected. The game state is unchanged on rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "reason", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum RejectionReason {
    /// No plot with this id exists.
    UnknownPlot {
        /// The requested plot id.
        #[serde(rename = "plotId")]
        plot_id: usize,
    },
    /// The crop is not in the catalog.
    UnknownCrop {
        /// The requested crop key.
        crop: String,
    },
    /// No herd of this kind exists.
    UnknownLivestock {
        /// The requested livestock kind.
        kind: String,
    },
    /// The plot already has a crop.
    PlotOccupied {
        /// The occupied plot.
        #[serde(rename = "plotId")]
        plot_id: usize,
    },
    /// The crop is not ready for harvest.
    NotMature {
        /// The plot that was not ready.
        #[serde(rename = "plotId")]
        plot_id: usize,
        /// Its current stage.
        stage: GrowthStage,
    },
    /// The action costs more than the available budget.
    InsufficientBudget {
        /// Cost of the action.
        required: i64,
        /// Budget at the time of the request.
        available: i64,
    },
    /// A livestock count of zero was requested.
    InvalidCount,
}

impl core::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownPlot { plot_id } => write!(f, "invalid plot id {plot_id}"),
            Self::UnknownCrop { crop } => write!(f, "unknown crop {crop:?}"),
            Self::UnknownLivestock { kind } => write!(f, "no livestock of kind {kind:?}"),
            Self::PlotOccupied { plot_id } => write!(f, "plot {plot_id} already has a crop"),
            Self::NotMature { plot_id, stage } => {
                write!(f, "plot {plot_id} is not ready for harvest (stage {stage:?})")
            }
            Self::InsufficientBudget {
                required,
                available,
            } => write!(f, "insufficient budget: need {required}, have {available}"),
            Self::InvalidCount => f.write_str("livestock count must be at least 1"),
        }
    }
}
