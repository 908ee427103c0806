//! Structured output contracts
//!
//! Each document the generation service can return has a wire type that
//! implements [`Document`]: serde handles required fields and types, and
//! `validate` enforces cardinality and value bounds. Every failure becomes a
//! [`SchemaValidationError`] carrying the offending field path.

mod assets;
mod error;
mod plan;
mod research;
mod risks;

#[cfg(test)]
pub(crate) mod fixtures;

pub use assets::AssetsDoc;
pub use error::SchemaValidationError;
pub use plan::{
    EFFORT_HOURS, MILESTONES, Milestone, MilestoneEdit, PlanDoc, PlanEditError, PlanOut, TASKS_PER_MILESTONE, TaskItem,
    parse_due,
};
pub use research::{Reference, ResearchDoc, ResearchOut, Target};
pub use risks::{RiskItem, RiskMap, Risks};

use serde::de::DeserializeOwned;
use tracing::debug;

/// A document type with a structural contract
pub trait Document: DeserializeOwned {
    /// Name used in validation errors
    const NAME: &'static str;

    /// Check bounds that serde alone cannot express
    fn validate(&self) -> Result<(), SchemaValidationError>;
}

/// Parse and validate a service response as document `T`
pub fn parse_document<T: Document>(text: &str) -> Result<T, SchemaValidationError> {
    debug!(document = T::NAME, text_len = text.len(), "parse_document: called");
    let json = extract_json(text)
        .ok_or_else(|| SchemaValidationError::new(T::NAME, "$", "response contains no JSON object"))?;

    let de = &mut serde_json::Deserializer::from_str(json);
    let doc: T = serde_path_to_error::deserialize(de).map_err(|e| {
        let path = e.path().to_string();
        let path = if path == "." { "$".to_string() } else { path };
        debug!(document = T::NAME, %path, "parse_document: deserialization failed");
        SchemaValidationError::new(T::NAME, path, e.into_inner().to_string())
    })?;

    doc.validate()?;
    Ok(doc)
}

/// Locate the JSON object in a model response
///
/// Strips markdown code fences and any prose around the outermost braces.
pub fn extract_json(text: &str) -> Option<&str> {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        body = body.strip_suffix("```").unwrap_or(body).trim();
    }
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&body[start..=end])
}
