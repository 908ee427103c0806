//! Research stage

use tracing::debug;

use crate::config::StageConfig;
use crate::llm::LlmClient;
use crate::prompts::{PromptContext, PromptLoader};
use crate::schema::ResearchOut;

use super::stage::{Stage, generate, or_default};
use super::{Brief, StageError};

pub const DEFAULT_AUDIENCE: &str = "general";
pub const DEFAULT_CONSTRAINTS: &str = "keep budget low";

/// Ask for targets, insights, risks and references for the brief
///
/// Returns the wire-form document; risk normalization is the caller's job.
pub async fn research(
    llm: &dyn LlmClient,
    prompts: &PromptLoader,
    config: &StageConfig,
    brief: &Brief,
) -> Result<ResearchOut, StageError> {
    debug!(goal = %brief.goal, "research: called");
    let context = PromptContext {
        goal: brief.goal.clone(),
        audience: or_default(&brief.audience, DEFAULT_AUDIENCE),
        constraints: or_default(&brief.constraints, DEFAULT_CONSTRAINTS),
        ..Default::default()
    };
    generate(llm, prompts, Stage::Research, config, context).await
}
