//! Schema validation error

use thiserror::Error;

/// A generated document did not satisfy its structural contract
///
/// `path` points at the offending field (`milestones[0].tasks[2].effort_hrs`),
/// or `$` when the response as a whole was unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{document} failed schema validation at `{path}`: {message}")]
pub struct SchemaValidationError {
    pub document: &'static str,
    pub path: String,
    pub message: String,
}

impl SchemaValidationError {
    pub fn new(document: &'static str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            document,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Check a list length against an inclusive `[min, max]` bound
pub(crate) fn check_len(
    document: &'static str,
    path: &str,
    len: usize,
    min: usize,
    max: usize,
) -> Result<(), SchemaValidationError> {
    if len < min || len > max {
        return Err(SchemaValidationError::new(
            document,
            path,
            format!("expected between {} and {} items, got {}", min, max, len),
        ));
    }
    Ok(())
}
