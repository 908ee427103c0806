//! REPL session management

use std::path::{Path, PathBuf};

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info};

use crate::config::Config;
use crate::deliver::{self, DeliveryError, EmailDraft, SmtpSender};
use crate::llm::create_client;
use crate::pipeline::{Brief, Orchestrator, Session, Stage, StageError};
use crate::presets;
use crate::prompts::PromptLoader;

use super::commands::{self, SlashCommand};
use super::render;

/// What the loop should show after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Warning(String),
    Error(String),
    Quit,
}

/// Interactive REPL session
pub struct ReplSession {
    config: Config,
    orchestrator: Orchestrator,
    session: Session,
    brief: Brief,
    to: String,
    from: String,
    subject: Option<String>,
}

impl ReplSession {
    /// Create a session talking to the configured generation service
    pub fn new(config: Config) -> Result<Self> {
        debug!("ReplSession::new: called");
        let orchestrator = build_orchestrator(&config)?;
        Ok(Self::with_orchestrator(config, orchestrator))
    }

    pub fn with_orchestrator(config: Config, orchestrator: Orchestrator) -> Self {
        let from = config.smtp.user.clone();
        Self {
            config,
            orchestrator,
            session: Session::new(),
            brief: Brief::default(),
            to: String::new(),
            from,
            subject: None,
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    let reply = if input.starts_with('/') {
                        match commands::parse(input) {
                            Ok(SlashCommand::Send) if !self.confirm_send(&mut rl) => {
                                Reply::Warning("Please confirm the recipient and content.".to_string())
                            }
                            Ok(command) => self.execute(command).await,
                            Err(usage) => Reply::Warning(usage),
                        }
                    } else {
                        // Bare text sets the goal
                        self.execute(SlashCommand::Goal(input.to_string())).await
                    };

                    match reply {
                        Reply::Text(text) => println!("{}", text),
                        Reply::Warning(text) => println!("{} {}", "!".yellow(), text.yellow()),
                        Reply::Error(text) => println!("{} {}", "x".red(), text.red()),
                        Reply::Quit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Action Planner".bright_cyan().bold());
        println!("From goal to research to plan to assets.");
        println!("Model: {}", self.config.llm.model);
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
        println!("{}", self.brief_text());
        println!();
    }

    fn confirm_send(&self, rl: &mut DefaultEditor) -> bool {
        let Some(draft) = self.draft() else {
            // execute() reports the missing assets
            return true;
        };
        let prompt = format!(
            "Send {:?} to {} from {}? [y/N] ",
            draft.subject,
            if draft.to.is_empty() { "(no recipient)" } else { draft.to.as_str() },
            if draft.from.is_empty() { self.config.smtp.user.as_str() } else { draft.from.as_str() },
        );
        matches!(rl.readline(&prompt), Ok(answer) if answer.trim().eq_ignore_ascii_case("y"))
    }

    /// Execute one command against the session
    pub async fn execute(&mut self, command: SlashCommand) -> Reply {
        debug!(?command, "ReplSession::execute: called");
        match command {
            SlashCommand::Goal(goal) => {
                self.brief.goal = goal;
                Reply::Text("Goal set.".to_string())
            }
            SlashCommand::Audience(audience) => {
                self.brief.audience = audience;
                Reply::Text("Audience set.".to_string())
            }
            SlashCommand::Constraints(constraints) => {
                self.brief.constraints = constraints;
                Reply::Text("Constraints set.".to_string())
            }
            SlashCommand::Preset(name) => match presets::find(&name) {
                Some(preset) => {
                    self.brief = preset.brief();
                    Reply::Text(self.brief_text())
                }
                None => Reply::Error(format!(
                    "Unknown preset '{}'. Available: {}",
                    name,
                    presets::names().join(", ")
                )),
            },
            SlashCommand::Brief => Reply::Text(self.brief_text()),
            SlashCommand::Model(None) => Reply::Text(format!("Model: {}", self.config.llm.model)),
            SlashCommand::Model(Some(model)) => self.set_model(model),
            SlashCommand::Research => self.run_stage(Stage::Research).await,
            SlashCommand::Plan => self.run_stage(Stage::Plan).await,
            SlashCommand::Assets => self.run_stage(Stage::Assets).await,
            SlashCommand::Run => {
                let report = self.orchestrator.run_all(&mut self.session, &self.brief).await;
                let mut text = render::report(&report);
                text.push_str(&self.show(None));
                text.push_str(&render::timeline(&self.session));
                Reply::Text(text)
            }
            SlashCommand::Show(which) => self.show_one(which.as_deref()),
            SlashCommand::Timeline => Reply::Text(render::timeline(&self.session)),
            SlashCommand::Edit { number, edit } => {
                if !self.session.edit_mode {
                    return Reply::Warning("Run /plan before editing milestones.".to_string());
                }
                let Some(plan) = self.session.plan.as_mut() else {
                    return Reply::Warning("Run /plan before editing milestones.".to_string());
                };
                let Some(index) = number.checked_sub(1) else {
                    return Reply::Warning(commands::EDIT_USAGE.to_string());
                };
                match plan.edit_milestone(index, edit.into()) {
                    Ok(()) => Reply::Text(format!("Saved.\n{}", render::plan(plan))),
                    Err(e) => Reply::Error(e.to_string()),
                }
            }
            SlashCommand::Reset => {
                self.session.reset();
                Reply::Text("Session cleared.".to_string())
            }
            SlashCommand::To(to) => {
                self.to = to;
                Reply::Text(format!("Recipient: {}", self.to))
            }
            SlashCommand::From(from) => {
                self.from = from;
                Reply::Text(format!("Sender: {}", self.from))
            }
            SlashCommand::Subject(subject) => {
                self.subject = Some(subject);
                Reply::Text("Subject set.".to_string())
            }
            SlashCommand::Mailto => match self.draft() {
                Some(draft) => Reply::Text(draft.mailto_link()),
                None => no_assets(),
            },
            SlashCommand::Eml(path) => match self.draft() {
                Some(draft) => {
                    let path = path.unwrap_or_else(|| PathBuf::from(deliver::EML_FILE_NAME));
                    delivered(draft.to_eml().and_then(|bytes| write_file(&path, &bytes)))
                }
                None => no_assets(),
            },
            SlashCommand::Send => self.send().await,
            SlashCommand::Ics(path) => match &self.session.plan {
                Some(plan) => {
                    let path = path.unwrap_or_else(|| PathBuf::from(deliver::CALENDAR_FILE_NAME));
                    delivered(deliver::milestones_ics(plan).and_then(|ics| write_file(&path, ics.as_bytes())))
                }
                None => Reply::Warning("Run /plan first.".to_string()),
            },
            SlashCommand::Export(dir) => match (&self.session.plan, &self.session.assets) {
                (Some(plan), Some(assets)) => {
                    let dir = dir.unwrap_or_else(|| PathBuf::from("."));
                    let written = deliver::write_launch_pack(&dir, plan, self.session.research.as_ref(), assets);
                    match written {
                        Ok(path) => Reply::Text(format!(
                            "Wrote {} and {}",
                            path.display(),
                            dir.join(deliver::PLAN_FILE_NAME).display()
                        )),
                        Err(e) => Reply::Error(e.to_string()),
                    }
                }
                _ => no_assets(),
            },
            SlashCommand::Help => Reply::Text(help_text()),
            SlashCommand::Quit => Reply::Quit,
        }
    }

    async fn run_stage(&mut self, stage: Stage) -> Reply {
        let result = self.orchestrator.run_stage(&mut self.session, &self.brief, stage).await;
        match result {
            Ok(()) => {
                let mut text = format!("{} ready.\n", stage).green().to_string();
                if stage == Stage::Plan {
                    text.push_str("\nEdit milestones with /edit before producing assets.\n");
                }
                text.push('\n');
                text.push_str(&self.show(Some(stage)));
                text.push_str(&render::timeline(&self.session));
                Reply::Text(text)
            }
            Err(StageError::Precondition(message)) => Reply::Warning(message),
            Err(e) => Reply::Error(format!("{} failed. Please try again.\n{}", stage, e)),
        }
    }

    fn set_model(&mut self, model: String) -> Reply {
        let mut llm = self.config.llm.clone();
        llm.model = model;
        let previous = std::mem::replace(&mut self.config.llm, llm);
        match build_orchestrator(&self.config) {
            Ok(orchestrator) => {
                self.orchestrator = orchestrator;
                info!(model = %self.config.llm.model, "ReplSession::set_model: model changed");
                Reply::Text(format!("Model: {}", self.config.llm.model))
            }
            Err(e) => {
                self.config.llm = previous;
                Reply::Error(e.to_string())
            }
        }
    }

    async fn send(&self) -> Reply {
        let Some(draft) = self.draft() else {
            return no_assets();
        };
        let sender = match SmtpSender::from_config(&self.config.smtp) {
            Ok(sender) => sender,
            Err(e) => return Reply::Error(e.to_string()),
        };
        match sender.send(&draft).await {
            Ok(()) => Reply::Text("Email sent.".to_string()),
            Err(DeliveryError::InvalidAddress(address)) if address == draft.to.trim() => {
                Reply::Error("Recipient email looks invalid.".to_string())
            }
            Err(DeliveryError::InvalidAddress(_)) => Reply::Error("Sender email looks invalid.".to_string()),
            Err(e) => Reply::Error(e.to_string()),
        }
    }

    fn draft(&self) -> Option<EmailDraft> {
        let assets = self.session.assets.as_ref()?;
        let mut draft = EmailDraft::from_launch_email(&assets.launch_email);
        if let Some(subject) = &self.subject {
            draft.subject = subject.clone();
        }
        draft.to = self.to.clone();
        draft.from = self.from.clone();
        Some(draft)
    }

    fn brief_text(&self) -> String {
        format!(
            "{} {}\n{} {}\n{} {}",
            "Goal:".bold(),
            self.brief.goal,
            "Audience:".bold(),
            self.brief.audience,
            "Constraints:".bold(),
            self.brief.constraints
        )
    }

    /// Render one stage's document, or every available one
    fn show(&self, stage: Option<Stage>) -> String {
        let mut text = String::new();
        let wanted = |s: Stage| stage.is_none_or(|w| w == s);
        if let Some(doc) = self.session.research.as_ref().filter(|_| wanted(Stage::Research)) {
            text.push_str(&render::research(doc));
            text.push('\n');
        }
        if let Some(doc) = self.session.plan.as_ref().filter(|_| wanted(Stage::Plan)) {
            text.push_str(&render::plan(doc));
            text.push('\n');
        }
        if let Some(doc) = self.session.assets.as_ref().filter(|_| wanted(Stage::Assets)) {
            text.push_str(&render::assets(doc));
            text.push('\n');
        }
        text
    }

    fn show_one(&self, which: Option<&str>) -> Reply {
        let stage = match which {
            None => None,
            Some("research") => Some(Stage::Research),
            Some("plan") => Some(Stage::Plan),
            Some("assets") => Some(Stage::Assets),
            Some(other) => return Reply::Error(format!("Nothing called '{}'. Try research, plan or assets.", other)),
        };
        let text = self.show(stage);
        if text.is_empty() {
            return Reply::Warning("Nothing to show yet. Try /run.".to_string());
        }
        Reply::Text(text)
    }
}

fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let llm = create_client(&config.llm).map_err(|e| eyre::eyre!("Failed to create LLM client: {}", e))?;
    let prompts = PromptLoader::new(std::env::current_dir()?);
    Ok(Orchestrator::new(llm, prompts, config.stages.clone()))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<PathBuf, DeliveryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(path.to_path_buf())
}

fn delivered(result: Result<PathBuf, DeliveryError>) -> Reply {
    match result {
        Ok(path) => Reply::Text(format!("Wrote {}", path.display())),
        Err(e) => Reply::Error(e.to_string()),
    }
}

fn no_assets() -> Reply {
    Reply::Warning("Produce assets first (/assets or /run).".to_string())
}

fn help_text() -> String {
    let rows: &[(&str, &str)] = &[
        ("/goal TEXT", "Set the goal (bare text works too)"),
        ("/audience TEXT", "Set the audience"),
        ("/constraints TEXT", "Set budget, time and tone constraints"),
        ("/preset NAME", "Load a preset brief (podcast, workshop, landing)"),
        ("/brief", "Show the current brief"),
        ("/model [NAME]", "Show or change the model"),
        ("/research", "1) Research"),
        ("/plan", "2) Plan"),
        ("/assets", "3) Produce assets"),
        ("/run", "Run all three stages"),
        ("/show [WHAT]", "Show research, plan, assets or everything"),
        ("/timeline", "Show workflow progress"),
        ("/edit N FIELD VALUE", "Edit milestone N: title, due or tasks"),
        ("/reset", "Clear all documents"),
        ("/to ADDRESS", "Set the email recipient"),
        ("/from ADDRESS", "Set the email sender"),
        ("/subject TEXT", "Override the email subject"),
        ("/mailto", "Print a mailto link for the launch email"),
        ("/eml [PATH]", "Write the launch email as .eml"),
        ("/send", "Send the launch email via SMTP"),
        ("/ics [PATH]", "Write milestones as a calendar"),
        ("/export [DIR]", "Write the launch pack and plan.json"),
        ("/help", "Show this help"),
        ("/quit", "Exit"),
    ];
    let mut text = format!("{}\n", "Available Commands:".bright_cyan());
    for (cmd, desc) in rows {
        text.push_str(&format!("  {:22} {}\n", cmd.yellow(), desc));
    }
    text
}
