//! Plan stage

use tracing::debug;

use crate::config::StageConfig;
use crate::llm::LlmClient;
use crate::prompts::{PromptContext, PromptLoader};
use crate::schema::PlanOut;

use super::research::{DEFAULT_AUDIENCE, DEFAULT_CONSTRAINTS};
use super::stage::{Stage, generate, or_default};
use super::{Brief, StageError};

/// Ask for milestones, tasks, success metrics and risks for the brief
///
/// Nothing is clamped: out-of-range output fails validation.
pub async fn plan(
    llm: &dyn LlmClient,
    prompts: &PromptLoader,
    config: &StageConfig,
    brief: &Brief,
) -> Result<PlanOut, StageError> {
    debug!(goal = %brief.goal, "plan: called");
    let context = PromptContext {
        goal: brief.goal.clone(),
        audience: or_default(&brief.audience, DEFAULT_AUDIENCE),
        constraints: or_default(&brief.constraints, DEFAULT_CONSTRAINTS),
        ..Default::default()
    };
    generate(llm, prompts, Stage::Plan, config, context).await
}
