//! Assets document contract

use serde::{Deserialize, Serialize};

use super::Document;
use super::error::{SchemaValidationError, check_len};

/// Launch assets; produced once per assets run and never edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetsDoc {
    /// Optional `Subject: ...` first line, then the body
    pub launch_email: String,
    pub social_posts: Vec<String>,
    /// Markdown
    pub script_outline: String,
    /// Markdown
    pub weekly_checklist: String,
}

impl Document for AssetsDoc {
    const NAME: &'static str = "AssetsOut";

    fn validate(&self) -> Result<(), SchemaValidationError> {
        check_len(Self::NAME, "social_posts", self.social_posts.len(), 3, 5)
    }
}
