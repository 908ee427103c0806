//! Pipeline orchestrator
//!
//! Sequences the stages, gates Assets on a plan, normalizes risks and keeps
//! the session's per-stage status current.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::StagesConfig;
use crate::llm::LlmClient;
use crate::prompts::PromptLoader;

use super::session::{Session, StageStatus};
use super::{Brief, Stage, StageError, assets, plan, research};

/// Warning shown when Assets is requested without a plan
pub const PLAN_REQUIRED: &str = "Run planning first.";

/// How one stage fared in a run-all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Succeeded,
    Failed(String),
    Skipped,
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed(message) => write!(f, "failed: {}", message),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Per-stage outcomes of a run-all, in stage order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<(Stage, StageOutcome)>,
}

impl RunReport {
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.outcomes.iter().find(|(s, _)| *s == stage).map(|(_, o)| o)
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|(_, o)| *o == StageOutcome::Succeeded)
    }
}

/// Drives stage calls against one generation service
pub struct Orchestrator {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    stages: StagesConfig,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, stages: StagesConfig) -> Self {
        debug!("Orchestrator::new: called");
        Self { llm, prompts, stages }
    }

    /// Run Research and store the normalized document
    pub async fn run_research(&self, session: &mut Session, brief: &Brief) -> Result<(), StageError> {
        debug!("Orchestrator::run_research: called");
        session.set_status(Stage::Research, StageStatus::Running);
        let result = research::research(self.llm.as_ref(), &self.prompts, &self.stages.research, brief).await;
        let result = result.map(|out| {
            session.research = Some(out.normalize());
        });
        Self::record(session, Stage::Research, result)
    }

    /// Run Plan, store the normalized document and enable editing
    pub async fn run_plan(&self, session: &mut Session, brief: &Brief) -> Result<(), StageError> {
        debug!("Orchestrator::run_plan: called");
        session.set_status(Stage::Plan, StageStatus::Running);
        let result = plan::plan(self.llm.as_ref(), &self.prompts, &self.stages.plan, brief).await;
        let result = result.map(|out| {
            session.plan = Some(out.normalize());
            session.edit_mode = true;
        });
        Self::record(session, Stage::Plan, result)
    }

    /// Run Assets against the session's current plan and research
    ///
    /// Refused without a call when there is no plan; the stage status is left
    /// as it was.
    pub async fn run_assets(&self, session: &mut Session, brief: &Brief) -> Result<(), StageError> {
        debug!("Orchestrator::run_assets: called");
        let Some(plan_doc) = session.plan.clone() else {
            warn!("Orchestrator::run_assets: no plan, refusing");
            return Err(StageError::Precondition(PLAN_REQUIRED.to_string()));
        };
        let research_doc = session.research.clone();

        session.set_status(Stage::Assets, StageStatus::Running);
        let result = assets::assets(
            self.llm.as_ref(),
            &self.prompts,
            &self.stages.assets,
            brief,
            &plan_doc,
            research_doc.as_ref(),
        )
        .await;
        let result = result.map(|doc| {
            session.assets = Some(doc);
        });
        Self::record(session, Stage::Assets, result)
    }

    /// Run a single stage by name
    pub async fn run_stage(&self, session: &mut Session, brief: &Brief, stage: Stage) -> Result<(), StageError> {
        match stage {
            Stage::Research => self.run_research(session, brief).await,
            Stage::Plan => self.run_plan(session, brief).await,
            Stage::Assets => self.run_assets(session, brief).await,
        }
    }

    /// Research, then Plan, then Assets; stop at the first failure
    ///
    /// Failures are recorded in the report and the session, never returned.
    pub async fn run_all(&self, session: &mut Session, brief: &Brief) -> RunReport {
        info!(goal = %brief.goal, "Orchestrator::run_all: called");
        let mut outcomes = Vec::with_capacity(Stage::ALL.len());
        let mut failed = false;

        for stage in Stage::ALL {
            if failed {
                debug!(%stage, "Orchestrator::run_all: skipping after earlier failure");
                outcomes.push((stage, StageOutcome::Skipped));
                continue;
            }
            match self.run_stage(session, brief, stage).await {
                Ok(()) => outcomes.push((stage, StageOutcome::Succeeded)),
                Err(e) => {
                    failed = true;
                    outcomes.push((stage, StageOutcome::Failed(e.to_string())));
                }
            }
        }

        RunReport { outcomes }
    }

    fn record(session: &mut Session, stage: Stage, result: Result<(), StageError>) -> Result<(), StageError> {
        match &result {
            Ok(()) => {
                info!(%stage, "stage succeeded");
                session.set_status(stage, StageStatus::Succeeded);
            }
            Err(e) => {
                warn!(%stage, kind = e.kind(), error = %e, "stage failed");
                session.set_status(stage, StageStatus::Failed { message: e.to_string() });
            }
        }
        result
    }
}
