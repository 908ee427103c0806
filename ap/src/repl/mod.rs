//! Interactive REPL for Action Planner
//!
//! Holds one session: the brief, the three documents and the email
//! settings. Slash commands drive the stages and the exports.

mod commands;
pub mod render;
mod session;

pub use commands::{MilestoneEditSpec, SlashCommand};
pub use session::{ReplSession, Reply};

use eyre::Result;

use crate::config::Config;

/// Run the interactive REPL
///
/// This is the entry point for `ap` without a subcommand. The API key is not
/// checked here; a missing key surfaces when a stage runs.
pub async fn run_interactive(config: Config) -> Result<()> {
    let mut session = ReplSession::new(config)?;
    session.run().await
}
