//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

pub const RESEARCH_SYSTEM: &str = include_str!("../../prompts/research-system.pmt");
pub const RESEARCH: &str = include_str!("../../prompts/research.pmt");
pub const PLAN_SYSTEM: &str = include_str!("../../prompts/plan-system.pmt");
pub const PLAN: &str = include_str!("../../prompts/plan.pmt");
pub const ASSETS_SYSTEM: &str = include_str!("../../prompts/assets-system.pmt");
pub const ASSETS: &str = include_str!("../../prompts/assets.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "research-system" => Some(RESEARCH_SYSTEM),
        "research" => Some(RESEARCH),
        "plan-system" => Some(PLAN_SYSTEM),
        "plan" => Some(PLAN),
        "assets-system" => Some(ASSETS_SYSTEM),
        "assets" => Some(ASSETS),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
