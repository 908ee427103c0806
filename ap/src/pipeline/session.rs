//! Session store: document slots and per-stage status

use tracing::debug;

use crate::schema::{AssetsDoc, PlanDoc, ResearchDoc};

use super::Stage;

/// Per-stage state machine: `Idle -> Running -> {Succeeded, Failed}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StageStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed { message: String },
}

impl StageStatus {
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Everything one interactive session knows
///
/// Owned by the surface driving it and passed by `&mut` to the orchestrator.
#[derive(Debug, Default)]
pub struct Session {
    pub research: Option<ResearchDoc>,
    pub plan: Option<PlanDoc>,
    pub assets: Option<AssetsDoc>,
    /// Set once a plan has been produced; enables milestone edits
    pub edit_mode: bool,
    statuses: [StageStatus; 3],
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, stage: Stage) -> &StageStatus {
        &self.statuses[stage.index()]
    }

    pub(crate) fn set_status(&mut self, stage: Stage, status: StageStatus) {
        debug!(%stage, ?status, "Session::set_status: called");
        self.statuses[stage.index()] = status;
    }

    /// Whether a stage's document is available
    pub fn has_document(&self, stage: Stage) -> bool {
        match stage {
            Stage::Research => self.research.is_some(),
            Stage::Plan => self.plan.is_some(),
            Stage::Assets => self.assets.is_some(),
        }
    }

    /// Drop all documents and return every stage to `Idle`
    pub fn reset(&mut self) {
        debug!("Session::reset: called");
        *self = Self::default();
    }
}
