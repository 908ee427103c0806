//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::pipeline::Brief;
use crate::presets;

/// Action Planner - goal to research, plan and launch assets
#[derive(Parser)]
#[command(
    name = "ap",
    about = "Turn a goal into research, a milestone plan and launch assets",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (interactive session when omitted)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Brief flags shared by the stage commands
#[derive(Debug, Clone, Default, Args)]
pub struct BriefArgs {
    /// Start from a preset (podcast, workshop, landing)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// What you want to achieve
    #[arg(short, long)]
    pub goal: Option<String>,

    /// Who it is for
    #[arg(short, long)]
    pub audience: Option<String>,

    /// Budget, time and tone constraints
    #[arg(long)]
    pub constraints: Option<String>,
}

impl BriefArgs {
    /// Preset (or the default brief) with any explicit flags applied on top
    pub fn resolve(&self) -> Result<Brief, String> {
        debug!(?self, "BriefArgs::resolve: called");
        let mut brief = match &self.preset {
            Some(name) => presets::find(name).map(|p| p.brief()).ok_or_else(|| {
                format!("Unknown preset '{}'. Available: {}", name, presets::names().join(", "))
            })?,
            None => Brief::default(),
        };
        if let Some(goal) = &self.goal {
            brief.goal = goal.clone();
        }
        if let Some(audience) = &self.audience {
            brief.audience = audience.clone();
        }
        if let Some(constraints) = &self.constraints {
            brief.constraints = constraints.clone();
        }
        Ok(brief)
    }
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run research, plan and assets in order
    Run {
        #[command(flatten)]
        brief: BriefArgs,

        /// Write the launch pack and plan.json into this directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Run the research stage and print the document as JSON
    Research {
        #[command(flatten)]
        brief: BriefArgs,
    },

    /// Run the plan stage and print the document as JSON
    Plan {
        #[command(flatten)]
        brief: BriefArgs,
    },

    /// Produce assets from an exported plan (and optional research)
    Assets {
        #[command(flatten)]
        brief: BriefArgs,

        /// Plan JSON file
        #[arg(long)]
        plan: PathBuf,

        /// Research JSON file used for grounding
        #[arg(long)]
        research: Option<PathBuf>,
    },

    /// List the built-in presets
    Presets,
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("action-planner")
        .join("logs")
        .join("action-planner.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with presets and the log location
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let mut help = String::new();

    help.push_str("Presets:\n");
    for preset in presets::PRESETS {
        help.push_str(&format!("  {:<10} {}\n", preset.name, preset.goal));
    }

    help.push('\n');
    help.push_str("Run without a subcommand for the interactive session.\n");
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["ap"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["ap", "run", "--preset", "workshop", "--out", "pack"]);
        if let Some(Command::Run { brief, out }) = cli.command {
            assert_eq!(brief.preset.as_deref(), Some("workshop"));
            assert_eq!(out, Some(PathBuf::from("pack")));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_assets() {
        let cli = Cli::parse_from(["ap", "assets", "--plan", "plan.json", "--goal", "Ship it"]);
        if let Some(Command::Assets { brief, plan, research }) = cli.command {
            assert_eq!(plan, PathBuf::from("plan.json"));
            assert!(research.is_none());
            assert_eq!(brief.goal.as_deref(), Some("Ship it"));
        } else {
            panic!("Expected Assets command");
        }
    }

    #[test]
    fn test_cli_assets_requires_plan() {
        assert!(Cli::try_parse_from(["ap", "assets"]).is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["ap", "-c", "/path/to/config.yml", "presets"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
    }

    #[test]
    fn test_brief_resolution() {
        let args = BriefArgs {
            preset: Some("landing".to_string()),
            audience: Some("indie hackers".to_string()),
            ..Default::default()
        };
        let brief = args.resolve().unwrap();
        assert_eq!(brief.goal, "Ship a product landing page in 5 days");
        assert_eq!(brief.audience, "indie hackers");

        assert_eq!(BriefArgs::default().resolve().unwrap(), Brief::default());

        let unknown = BriefArgs {
            preset: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(unknown.resolve().is_err());
    }

    #[test]
    fn test_after_help_lists_presets() {
        let help = generate_after_help();
        assert!(help.contains("podcast"));
        assert!(help.contains("action-planner.log"));
    }
}
