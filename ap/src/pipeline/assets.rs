//! Assets stage

use tracing::debug;

use crate::config::StageConfig;
use crate::llm::LlmClient;
use crate::prompts::{PromptContext, PromptLoader};
use crate::schema::{AssetsDoc, PlanDoc, ResearchDoc};

use super::research::DEFAULT_AUDIENCE;
use super::stage::{Stage, generate, or_default};
use super::{Brief, StageError};

pub const DEFAULT_CONSTRAINTS: &str = "concise, friendly";

/// Three-line summary of the research used to ground the assets
///
/// Target names, the first three insights, and the first two risks.
pub fn grounding_summary(research: &ResearchDoc) -> serde_json::Result<String> {
    let targets: Vec<&str> = research.targets.iter().map(|t| t.name.as_str()).collect();
    let insights: Vec<&str> = research.insights.iter().take(3).map(String::as_str).collect();
    let risks: Vec<&str> = research.risks.iter().take(2).map(|r| r.risk.as_str()).collect();
    Ok(format!(
        "targets={}\ninsights_top3={}\nrisks_top2={}",
        serde_json::to_string(&targets)?,
        serde_json::to_string(&insights)?,
        serde_json::to_string(&risks)?,
    ))
}

/// Ask for launch email, social posts, script outline and checklist
///
/// The caller guarantees a plan exists; research is optional grounding.
pub async fn assets(
    llm: &dyn LlmClient,
    prompts: &PromptLoader,
    config: &StageConfig,
    brief: &Brief,
    plan: &PlanDoc,
    research: Option<&ResearchDoc>,
) -> Result<AssetsDoc, StageError> {
    debug!(goal = %brief.goal, has_research = research.is_some(), "assets: called");
    let plan_json = plan
        .to_canonical_json()
        .map_err(|e| StageError::Template(format!("failed to encode plan: {}", e)))?;
    let research_summary = research
        .map(grounding_summary)
        .transpose()
        .map_err(|e| StageError::Template(format!("failed to encode research: {}", e)))?;

    let context = PromptContext {
        goal: brief.goal.clone(),
        audience: or_default(&brief.audience, DEFAULT_AUDIENCE),
        constraints: or_default(&brief.constraints, DEFAULT_CONSTRAINTS),
        plan_json: Some(plan_json),
        research_summary,
    };
    generate(llm, prompts, Stage::Assets, config, context).await
}
