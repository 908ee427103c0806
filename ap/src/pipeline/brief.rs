//! The user's brief: goal, audience and constraints

use serde::{Deserialize, Serialize};

pub const DEFAULT_GOAL: &str = "Launch a podcast in 2 weeks";
pub const DEFAULT_AUDIENCE: &str = "aspiring CS students";
pub const DEFAULT_CONSTRAINTS: &str = "low budget; weekly episodes; concise";

/// Inputs shared by every stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brief {
    pub goal: String,
    pub audience: String,
    pub constraints: String,
}

impl Brief {
    pub fn new(goal: impl Into<String>, audience: impl Into<String>, constraints: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            audience: audience.into(),
            constraints: constraints.into(),
        }
    }
}

impl Default for Brief {
    fn default() -> Self {
        Self::new(DEFAULT_GOAL, DEFAULT_AUDIENCE, DEFAULT_CONSTRAINTS)
    }
}
