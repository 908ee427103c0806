//! Slash command parsing

use std::path::PathBuf;

use crate::schema::{MilestoneEdit, TaskItem};

/// A parsed REPL command
#[derive(Debug, Clone, PartialEq)]
pub enum SlashCommand {
    Goal(String),
    Audience(String),
    Constraints(String),
    Preset(String),
    Brief,
    Model(Option<String>),
    Research,
    Plan,
    Assets,
    Run,
    Show(Option<String>),
    Timeline,
    /// One-based milestone number and the replacement values
    Edit { number: usize, edit: MilestoneEditSpec },
    Reset,
    To(String),
    From(String),
    Subject(String),
    Mailto,
    Eml(Option<PathBuf>),
    Send,
    Ics(Option<PathBuf>),
    Export(Option<PathBuf>),
    Help,
    Quit,
}

/// What `/edit` replaces on one milestone
#[derive(Debug, Clone, PartialEq)]
pub enum MilestoneEditSpec {
    Title(String),
    Due(String),
    Tasks(Vec<TaskItem>),
}

impl From<MilestoneEditSpec> for MilestoneEdit {
    fn from(spec: MilestoneEditSpec) -> Self {
        match spec {
            MilestoneEditSpec::Title(title) => MilestoneEdit {
                title: Some(title),
                ..Default::default()
            },
            MilestoneEditSpec::Due(due) => MilestoneEdit {
                due: Some(due),
                ..Default::default()
            },
            MilestoneEditSpec::Tasks(tasks) => MilestoneEdit {
                tasks: Some(tasks),
                ..Default::default()
            },
        }
    }
}

pub const EDIT_USAGE: &str = "Usage: /edit N title TEXT | /edit N due YYYY-MM-DD | /edit N tasks DESC=HRS; DESC=HRS";

/// Parse one input line starting with `/`
///
/// Errors carry a usage message for the user.
pub fn parse(input: &str) -> Result<SlashCommand, String> {
    let input = input.trim();
    let (cmd, rest) = match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (input, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());
    let path = arg.as_ref().map(PathBuf::from);

    let required = |usage: &str| arg.clone().ok_or_else(|| format!("Usage: {}", usage));

    let command = match cmd {
        "/goal" => SlashCommand::Goal(required("/goal TEXT")?),
        "/audience" => SlashCommand::Audience(rest.to_string()),
        "/constraints" => SlashCommand::Constraints(rest.to_string()),
        "/preset" => SlashCommand::Preset(required("/preset NAME")?),
        "/brief" => SlashCommand::Brief,
        "/model" => SlashCommand::Model(arg.clone()),
        "/research" => SlashCommand::Research,
        "/plan" => SlashCommand::Plan,
        "/assets" | "/produce" => SlashCommand::Assets,
        "/run" => SlashCommand::Run,
        "/show" => SlashCommand::Show(arg.clone()),
        "/timeline" => SlashCommand::Timeline,
        "/edit" => parse_edit(rest)?,
        "/reset" => SlashCommand::Reset,
        "/to" => SlashCommand::To(rest.to_string()),
        "/from" => SlashCommand::From(rest.to_string()),
        "/subject" => SlashCommand::Subject(required("/subject TEXT")?),
        "/mailto" => SlashCommand::Mailto,
        "/eml" => SlashCommand::Eml(path),
        "/send" => SlashCommand::Send,
        "/ics" => SlashCommand::Ics(path),
        "/export" => SlashCommand::Export(path),
        "/help" | "/h" => SlashCommand::Help,
        "/quit" | "/q" | "/exit" => SlashCommand::Quit,
        _ => return Err(format!("Unknown command: {}", cmd)),
    };
    Ok(command)
}

fn parse_edit(rest: &str) -> Result<SlashCommand, String> {
    let mut parts = rest.splitn(3, char::is_whitespace);
    let number = parts
        .next()
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| EDIT_USAGE.to_string())?;
    let field = parts.next().ok_or_else(|| EDIT_USAGE.to_string())?;
    let value = parts.next().map(str::trim).filter(|v| !v.is_empty()).ok_or_else(|| EDIT_USAGE.to_string())?;

    let edit = match field {
        "title" => MilestoneEditSpec::Title(value.to_string()),
        "due" => MilestoneEditSpec::Due(value.to_string()),
        "tasks" => MilestoneEditSpec::Tasks(parse_tasks(value)?),
        _ => return Err(EDIT_USAGE.to_string()),
    };
    Ok(SlashCommand::Edit { number, edit })
}

/// `desc=hours; desc=hours`, owner defaults to "You"
fn parse_tasks(value: &str) -> Result<Vec<TaskItem>, String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (desc, hours) = entry
                .rsplit_once('=')
                .ok_or_else(|| format!("Task {:?} needs DESC=HRS", entry))?;
            let hours = hours
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("Task {:?} has non-numeric hours", entry))?;
            TaskItem::new(desc.trim(), "You", hours).map_err(|e| e.to_string())
        })
        .collect()
}
