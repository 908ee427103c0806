//! Stage failure kinds

use thiserror::Error;

use crate::llm::LlmError;
use crate::schema::SchemaValidationError;

/// Why a stage invocation did not produce a document
#[derive(Debug, Error)]
pub enum StageError {
    /// The response broke the document contract (after the one retry)
    #[error(transparent)]
    SchemaValidation(#[from] SchemaValidationError),

    /// A prerequisite document is missing; no call was made
    #[error("{0}")]
    Precondition(String),

    /// The generation service could not be reached or refused the call
    #[error("Transport failure: {0}")]
    Transport(#[from] LlmError),

    /// A prompt template could not be loaded or rendered
    #[error("Template error: {0}")]
    Template(String),
}

impl StageError {
    /// Short kind label for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SchemaValidation(_) => "schema",
            Self::Precondition(_) => "precondition",
            Self::Transport(_) => "transport",
            Self::Template(_) => "template",
        }
    }

    /// Only contract violations earn a second attempt
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::SchemaValidation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinguishable() {
        let schema = StageError::from(SchemaValidationError::new("PlanOut", "milestones", "too few"));
        let transport = StageError::from(LlmError::MissingApiKey {
            env_var: "GROQ_API_KEY".to_string(),
        });
        let precondition = StageError::Precondition("Run planning first.".to_string());

        assert!(schema.is_schema());
        assert!(!transport.is_schema());
        assert!(!precondition.is_schema());
        assert_eq!(schema.kind(), "schema");
        assert_eq!(transport.kind(), "transport");
        assert_eq!(precondition.kind(), "precondition");
    }

    #[test]
    fn test_messages_are_readable() {
        let precondition = StageError::Precondition("Run planning first.".to_string());
        assert_eq!(precondition.to_string(), "Run planning first.");

        let transport = StageError::from(LlmError::MissingApiKey {
            env_var: "GROQ_API_KEY".to_string(),
        });
        assert!(transport.to_string().starts_with("Transport failure:"));
        assert!(transport.to_string().contains("GROQ_API_KEY"));

        let schema = StageError::from(SchemaValidationError::new("PlanOut", "milestones", "too few"));
        assert!(schema.to_string().contains("milestones"));
    }
}
