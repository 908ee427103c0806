//! Research document contract

use serde::{Deserialize, Serialize};

use super::error::{SchemaValidationError, check_len};
use super::risks::{RiskItem, Risks};
use super::{Document, parse_document};

/// A person or group the goal should reach, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub why: String,
}

/// A source worth reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    pub url: String,
}

/// Research as returned by the generation service (risks not yet normalized)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResearchOut {
    pub targets: Vec<Target>,
    pub insights: Vec<String>,
    pub risks: Risks,
    pub references: Vec<Reference>,
}

impl Document for ResearchOut {
    const NAME: &'static str = "ResearchOut";

    fn validate(&self) -> Result<(), SchemaValidationError> {
        check_len(Self::NAME, "targets", self.targets.len(), 2, 4)?;
        check_len(Self::NAME, "insights", self.insights.len(), 5, 8)?;
        self.risks.validate(Self::NAME, "risks", Some((2, 4)))?;
        check_len(Self::NAME, "references", self.references.len(), 3, 5)?;
        Ok(())
    }
}

impl ResearchOut {
    /// Convert to the canonical document with list-form risks
    pub fn normalize(self) -> ResearchDoc {
        ResearchDoc {
            targets: self.targets,
            insights: self.insights,
            risks: self.risks.normalize(),
            references: self.references,
        }
    }
}

/// Canonical research document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchDoc {
    pub targets: Vec<Target>,
    pub insights: Vec<String>,
    pub risks: Vec<RiskItem>,
    pub references: Vec<Reference>,
}

impl ResearchDoc {
    /// Load a previously exported document, re-checking its contract
    pub fn from_json(text: &str) -> Result<Self, SchemaValidationError> {
        parse_document::<ResearchOut>(text).map(ResearchOut::normalize)
    }

    /// Pretty JSON export form
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
