//! Text rendering of documents for the terminal

use std::fmt::Write;

use colored::Colorize;

use crate::pipeline::{RunReport, Session, Stage, StageOutcome};
use crate::schema::{AssetsDoc, PlanDoc, ResearchDoc, RiskItem, TaskItem};

fn badge(done: bool, label: &str) -> String {
    format!("{} {}", if done { "\u{2705}" } else { "\u{23F3}" }, label)
}

/// `Workflow: ✅ Research → ⏳ Plan → ⏳ Produce`
pub fn timeline(session: &Session) -> String {
    format!(
        "{} {} \u{2192} {} \u{2192} {}",
        "Workflow:".bold(),
        badge(session.has_document(Stage::Research), "Research"),
        badge(session.has_document(Stage::Plan), "Plan"),
        badge(session.has_document(Stage::Assets), "Produce"),
    )
}

fn risks(out: &mut String, risks: &[RiskItem]) {
    if risks.is_empty() {
        let _ = writeln!(out, "No major risks identified.");
        return;
    }
    let _ = writeln!(out, "{}", "Risks & Mitigations".bold());
    for item in risks {
        let _ = writeln!(out, "- Risk: {} | Mitigation: {}", item.risk, item.mitigation);
    }
}

pub fn research(doc: &ResearchDoc) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Research".bright_cyan().bold());

    let _ = writeln!(out, "{}", "Targets".bold());
    for target in &doc.targets {
        let _ = writeln!(out, "- {} ({})", target.name, target.why);
    }

    let _ = writeln!(out, "{}", "Insights".bold());
    for insight in &doc.insights {
        let _ = writeln!(out, "- {}", insight);
    }

    risks(&mut out, &doc.risks);

    let _ = writeln!(out, "{}", "References".bold());
    for reference in &doc.references {
        if reference.url.is_empty() {
            let _ = writeln!(out, "- {}", reference.title);
        } else {
            let _ = writeln!(out, "- [{}]({})", reference.title, reference.url);
        }
    }
    out
}

fn tasks_table(out: &mut String, tasks: &[TaskItem]) {
    let width = tasks.iter().map(|t| t.desc.chars().count()).max().unwrap_or(0).max(4);
    let _ = writeln!(out, "    {:<width$}  {:<8}  {}", "Task", "Owner", "Effort (hrs)", width = width);
    for task in tasks {
        let _ = writeln!(
            out,
            "    {:<width$}  {:<8}  {}",
            task.desc,
            task.owner,
            task.effort_hrs,
            width = width
        );
    }
}

pub fn plan(doc: &PlanDoc) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Plan".bright_cyan().bold());
    for (i, milestone) in doc.milestones.iter().enumerate() {
        let _ = writeln!(
            out,
            "{} due {}",
            format!("Milestone {}: {}", i + 1, milestone.title).bold(),
            milestone.due
        );
        tasks_table(&mut out, &milestone.tasks);
    }

    let _ = writeln!(out, "{}", "Success metrics".bold());
    for metric in &doc.success_metrics {
        let _ = writeln!(out, "- {}", metric);
    }
    risks(&mut out, &doc.risks);
    out
}

pub fn assets(doc: &AssetsDoc) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Assets".bright_cyan().bold());
    let _ = writeln!(out, "{}\n{}\n", "Launch email".bold(), doc.launch_email);
    let _ = writeln!(out, "{}", "Social posts".bold());
    for (i, post) in doc.social_posts.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, post);
    }
    let _ = writeln!(out, "\n{}\n{}\n", "Script outline".bold(), doc.script_outline);
    let _ = writeln!(out, "{}\n{}", "Weekly checklist".bold(), doc.weekly_checklist);
    out
}

/// One line per stage of a run-all
pub fn report(report: &RunReport) -> String {
    let mut out = String::new();
    for (stage, outcome) in &report.outcomes {
        let line = match outcome {
            StageOutcome::Succeeded => format!("{} ready", stage).green().to_string(),
            StageOutcome::Failed(message) => format!("{} failed: {}", stage, message).red().to_string(),
            StageOutcome::Skipped => format!("{} skipped", stage).dimmed().to_string(),
        };
        let _ = writeln!(out, "{}", line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::{assets_json, plan_json, research_json};

    #[test]
    fn test_timeline_badges() {
        let mut session = Session::new();
        let text = timeline(&session);
        assert!(text.contains("\u{23F3} Research"));

        session.plan = Some(PlanDoc::from_json(&plan_json().to_string()).unwrap());
        let text = timeline(&session);
        assert!(text.contains("\u{23F3} Research"));
        assert!(text.contains("\u{2705} Plan"));
        assert!(text.contains("\u{23F3} Produce"));
    }

    #[test]
    fn test_research_rendering() {
        let doc = ResearchDoc::from_json(&research_json().to_string()).unwrap();
        let text = research(&doc);
        assert!(text.contains("- CS freshmen (Looking for study habits)"));
        assert!(text.contains("- Risk: Time crunch | Mitigation: Batch record"));
        assert!(text.contains("- [Podcast guide](https://example.com/a)"));
    }

    #[test]
    fn test_plan_rendering() {
        let doc = PlanDoc::from_json(&plan_json().to_string()).unwrap();
        let text = plan(&doc);
        assert!(text.contains("Milestone 2: Record pilot"));
        assert!(text.contains("due 2025-06-08"));
        assert!(text.contains("Effort (hrs)"));
        assert!(text.contains("- 100 downloads in week one"));
    }

    #[test]
    fn test_assets_rendering_numbers_posts() {
        let doc: AssetsDoc = serde_json::from_value(assets_json()).unwrap();
        let text = assets(&doc);
        assert!(text.contains("1. New podcast for CS students"));
        assert!(text.contains("3. Subscribe for weekly 20-minute episodes."));
    }

    #[test]
    fn test_report_lines() {
        let report_value = RunReport {
            outcomes: vec![
                (Stage::Research, StageOutcome::Failed("boom".to_string())),
                (Stage::Plan, StageOutcome::Skipped),
                (Stage::Assets, StageOutcome::Skipped),
            ],
        };
        let text = report(&report_value);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Research failed: boom"));
        assert!(text.contains("Plan skipped"));
    }
}
