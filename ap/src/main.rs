//! Action Planner
//!
//! CLI entry point: one-shot stage commands or the interactive session.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use tracing::{debug, info};

use action_planner::cli::{BriefArgs, Cli, Command, generate_after_help, get_log_path};
use action_planner::config::Config;
use action_planner::deliver;
use action_planner::llm::create_client;
use action_planner::pipeline::{Orchestrator, Session, Stage};
use action_planner::presets::PRESETS;
use action_planner::prompts::PromptLoader;
use action_planner::repl::{self, render};
use action_planner::schema::{PlanDoc, ResearchDoc};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));

    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config_log_level);
    let level = match level_str.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Build command with dynamic after_help that lists presets and the log path
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "Action Planner loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Run { brief, out }) => cmd_run(&config, &brief, out.as_deref()).await,
        Some(Command::Research { brief }) => cmd_stage(&config, &brief, Stage::Research).await,
        Some(Command::Plan { brief }) => cmd_stage(&config, &brief, Stage::Plan).await,
        Some(Command::Assets { brief, plan, research }) => cmd_assets(&config, &brief, &plan, research.as_ref()).await,
        Some(Command::Presets) => cmd_presets(),
        None => {
            debug!("main: no command, starting interactive session");
            repl::run_interactive(config).await
        }
    }
}

fn orchestrator(config: &Config) -> Result<Orchestrator> {
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let prompts = PromptLoader::new(std::env::current_dir()?);
    Ok(Orchestrator::new(llm, prompts, config.stages.clone()))
}

/// Run all stages; non-zero exit when any stage fails
async fn cmd_run(config: &Config, brief: &BriefArgs, out: Option<&Path>) -> Result<()> {
    debug!(?brief, ?out, "cmd_run: called");
    let brief = brief.resolve().map_err(|e| eyre::eyre!(e))?;
    let orchestrator = orchestrator(config)?;
    let mut session = Session::new();

    println!("Goal: {}", brief.goal);
    println!();
    let report = orchestrator.run_all(&mut session, &brief).await;
    print!("{}", render::report(&report));
    println!();

    if let Some(doc) = &session.research {
        println!("{}", render::research(doc));
    }
    if let Some(doc) = &session.plan {
        println!("{}", render::plan(doc));
    }
    if let Some(doc) = &session.assets {
        println!("{}", render::assets(doc));
    }

    if !report.is_success() {
        return Err(eyre::eyre!("Run did not complete; see the stage report above"));
    }

    if let (Some(dir), Some(plan), Some(assets)) = (out, &session.plan, &session.assets) {
        let path = deliver::write_launch_pack(dir, plan, session.research.as_ref(), assets)
            .context("Failed to write launch pack")?;
        println!("Launch pack written to {}", path.display());
    }
    Ok(())
}

/// Run Research or Plan alone and print the document as JSON
async fn cmd_stage(config: &Config, brief: &BriefArgs, stage: Stage) -> Result<()> {
    debug!(?brief, %stage, "cmd_stage: called");
    let brief = brief.resolve().map_err(|e| eyre::eyre!(e))?;
    let orchestrator = orchestrator(config)?;
    let mut session = Session::new();

    orchestrator
        .run_stage(&mut session, &brief, stage)
        .await
        .with_context(|| format!("{} failed", stage))?;

    let json = match stage {
        Stage::Research => session.research.as_ref().map(ResearchDoc::to_pretty_json),
        Stage::Plan => session.plan.as_ref().map(PlanDoc::to_pretty_json),
        Stage::Assets => session.assets.as_ref().map(serde_json::to_string_pretty),
    };
    if let Some(json) = json {
        println!("{}", json?);
    }
    Ok(())
}

async fn cmd_assets(config: &Config, brief: &BriefArgs, plan: &Path, research: Option<&PathBuf>) -> Result<()> {
    debug!(?plan, ?research, "cmd_assets: called");
    let brief = brief.resolve().map_err(|e| eyre::eyre!(e))?;
    let mut session = Session::new();

    let text = fs::read_to_string(plan).with_context(|| format!("Failed to read {}", plan.display()))?;
    session.plan = Some(PlanDoc::from_json(&text).with_context(|| format!("Invalid plan in {}", plan.display()))?);

    if let Some(path) = research {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        session.research =
            Some(ResearchDoc::from_json(&text).with_context(|| format!("Invalid research in {}", path.display()))?);
    }

    let orchestrator = orchestrator(config)?;
    orchestrator
        .run_assets(&mut session, &brief)
        .await
        .context("Assets failed")?;

    if let Some(assets) = &session.assets {
        println!("{}", serde_json::to_string_pretty(assets)?);
    }
    Ok(())
}

fn cmd_presets() -> Result<()> {
    debug!("cmd_presets: called");
    for preset in PRESETS {
        println!("{}", preset.name);
        println!("  Goal:        {}", preset.goal);
        println!("  Audience:    {}", preset.audience);
        println!("  Constraints: {}", preset.constraints);
    }
    Ok(())
}
