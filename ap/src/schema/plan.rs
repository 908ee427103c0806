//! Plan document contract and milestone editing

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::{SchemaValidationError, check_len};
use super::risks::{RiskItem, Risks};
use super::{Document, parse_document};

/// Inclusive effort bound for a single task, in hours
pub const EFFORT_HOURS: (u32, u32) = (1, 12);

/// Milestones per plan
pub const MILESTONES: (usize, usize) = (2, 5);

/// Tasks per milestone
pub const TASKS_PER_MILESTONE: (usize, usize) = (2, 5);

fn default_owner() -> String {
    "You".to_string()
}

/// One actionable task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub desc: String,
    #[serde(default = "default_owner")]
    pub owner: String,
    pub effort_hrs: u32,
}

impl TaskItem {
    /// Build a task, enforcing the effort bound
    pub fn new(desc: impl Into<String>, owner: impl Into<String>, effort_hrs: u32) -> Result<Self, SchemaValidationError> {
        let task = Self {
            desc: desc.into(),
            owner: owner.into(),
            effort_hrs,
        };
        task.validate(PlanOut::NAME, "effort_hrs")?;
        Ok(task)
    }

    fn validate(&self, document: &'static str, path: &str) -> Result<(), SchemaValidationError> {
        let (min, max) = EFFORT_HOURS;
        if self.effort_hrs < min || self.effort_hrs > max {
            return Err(SchemaValidationError::new(
                document,
                path,
                format!("effort_hrs must be between {} and {}, got {}", min, max, self.effort_hrs),
            ));
        }
        Ok(())
    }
}

/// A dated milestone with its tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub due: String,
    pub tasks: Vec<TaskItem>,
}

impl Milestone {
    /// Parsed due date, if it is a valid `YYYY-MM-DD`
    pub fn due_date(&self) -> Option<NaiveDate> {
        parse_due(&self.due)
    }

    fn validate(&self, document: &'static str, path: &str) -> Result<(), SchemaValidationError> {
        if parse_due(&self.due).is_none() {
            return Err(SchemaValidationError::new(
                document,
                format!("{}.due", path),
                format!("expected a YYYY-MM-DD date, got {:?}", self.due),
            ));
        }
        let (min, max) = TASKS_PER_MILESTONE;
        check_len(document, &format!("{}.tasks", path), self.tasks.len(), min, max)?;
        for (i, task) in self.tasks.iter().enumerate() {
            task.validate(document, &format!("{}.tasks[{}].effort_hrs", path, i))?;
        }
        Ok(())
    }
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_due(due: &str) -> Option<NaiveDate> {
    let due = due.trim();
    if due.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(due, "%Y-%m-%d").ok()
}

/// Plan as returned by the generation service (risks not yet normalized)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanOut {
    pub milestones: Vec<Milestone>,
    pub success_metrics: Vec<String>,
    pub risks: Risks,
}

impl Document for PlanOut {
    const NAME: &'static str = "PlanOut";

    fn validate(&self) -> Result<(), SchemaValidationError> {
        let (min, max) = MILESTONES;
        check_len(Self::NAME, "milestones", self.milestones.len(), min, max)?;
        for (i, milestone) in self.milestones.iter().enumerate() {
            milestone.validate(Self::NAME, &format!("milestones[{}]", i))?;
        }
        self.risks.validate(Self::NAME, "risks", None)?;
        Ok(())
    }
}

impl PlanOut {
    /// Convert to the canonical document with list-form risks
    pub fn normalize(self) -> PlanDoc {
        PlanDoc {
            milestones: self.milestones,
            success_metrics: self.success_metrics,
            risks: self.risks.normalize(),
        }
    }
}

/// Canonical plan document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDoc {
    pub milestones: Vec<Milestone>,
    pub success_metrics: Vec<String>,
    pub risks: Vec<RiskItem>,
}

/// Replacement values for one milestone; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct MilestoneEdit {
    pub title: Option<String>,
    pub due: Option<String>,
    pub tasks: Option<Vec<TaskItem>>,
}

/// Why a milestone edit was rejected
#[derive(Debug, Error)]
pub enum PlanEditError {
    #[error("No milestone {number}; the plan has {count}")]
    NoSuchMilestone { number: usize, count: usize },

    #[error(transparent)]
    Invalid(#[from] SchemaValidationError),
}

impl PlanDoc {
    /// Load a previously exported plan, re-checking its contract
    pub fn from_json(text: &str) -> Result<Self, SchemaValidationError> {
        parse_document::<PlanOut>(text).map(PlanOut::normalize)
    }

    /// Compact canonical form, included verbatim in the assets request
    pub fn to_canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty JSON export form
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Replace milestone `index` (zero-based) with an edited copy
    ///
    /// The candidate is validated before it replaces the original, so a
    /// rejected edit leaves the plan untouched.
    pub fn edit_milestone(&mut self, index: usize, edit: MilestoneEdit) -> Result<(), PlanEditError> {
        let count = self.milestones.len();
        let current = self.milestones.get(index).ok_or(PlanEditError::NoSuchMilestone {
            number: index + 1,
            count,
        })?;

        let candidate = Milestone {
            title: edit.title.unwrap_or_else(|| current.title.clone()),
            due: edit.due.map(|d| d.trim().to_string()).unwrap_or_else(|| current.due.clone()),
            tasks: edit.tasks.unwrap_or_else(|| current.tasks.clone()),
        };
        candidate.validate(PlanOut::NAME, &format!("milestones[{}]", index))?;

        self.milestones[index] = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::plan_json;
    use serde_json::json;

    fn plan() -> PlanDoc {
        PlanDoc::from_json(&plan_json().to_string()).unwrap()
    }

    #[test]
    fn test_valid_plan_parses() {
        let doc = plan();
        assert_eq!(doc.milestones.len(), 3);
        assert_eq!(doc.milestones[0].tasks[0].owner, "You");
        assert_eq!(doc.risks.len(), 2);
    }

    #[test]
    fn test_single_milestone_rejected() {
        let mut value = plan_json();
        let first = value["milestones"][0].clone();
        value["milestones"] = json!([first]);
        let err = parse_document::<PlanOut>(&value.to_string()).unwrap_err();
        assert_eq!(err.path, "milestones");
    }

    #[test]
    fn test_six_tasks_rejected() {
        let mut value = plan_json();
        let task = json!({"desc": "x", "owner": "You", "effort_hrs": 2});
        value["milestones"][1]["tasks"] = json!([task.clone(), task.clone(), task.clone(), task.clone(), task.clone(), task]);
        let err = parse_document::<PlanOut>(&value.to_string()).unwrap_err();
        assert_eq!(err.path, "milestones[1].tasks");
    }

    #[test]
    fn test_effort_thirteen_rejected() {
        let mut value = plan_json();
        value["milestones"][0]["tasks"][1]["effort_hrs"] = json!(13);
        let err = parse_document::<PlanOut>(&value.to_string()).unwrap_err();
        assert_eq!(err.path, "milestones[0].tasks[1].effort_hrs");
    }

    #[test]
    fn test_effort_zero_rejected() {
        let mut value = plan_json();
        value["milestones"][2]["tasks"][0]["effort_hrs"] = json!(0);
        assert!(parse_document::<PlanOut>(&value.to_string()).is_err());
    }

    #[test]
    fn test_bad_due_date_rejected() {
        let mut value = plan_json();
        value["milestones"][0]["due"] = json!("next friday");
        let err = parse_document::<PlanOut>(&value.to_string()).unwrap_err();
        assert_eq!(err.path, "milestones[0].due");
    }

    #[test]
    fn test_parse_due_is_strict() {
        assert!(parse_due("2025-03-15").is_some());
        assert!(parse_due("2025-3-15").is_none());
        assert!(parse_due("2025-02-30").is_none());
        assert!(parse_due("15/03/2025").is_none());
    }

    #[test]
    fn test_task_new_enforces_effort() {
        assert!(TaskItem::new("Record", "You", 12).is_ok());
        assert!(TaskItem::new("Record", "You", 13).is_err());
        assert!(TaskItem::new("Record", "You", 0).is_err());
    }

    #[test]
    fn test_edit_milestone_title_and_due() {
        let mut doc = plan();
        doc.edit_milestone(
            1,
            MilestoneEdit {
                title: Some("Record pilot".to_string()),
                due: Some(" 2025-07-01 ".to_string()),
                tasks: None,
            },
        )
        .unwrap();
        assert_eq!(doc.milestones[1].title, "Record pilot");
        assert_eq!(doc.milestones[1].due, "2025-07-01");
        assert_eq!(doc.milestones[1].tasks, plan().milestones[1].tasks);
    }

    #[test]
    fn test_edit_milestone_replaces_task_set() {
        let mut doc = plan();
        let tasks = vec![
            TaskItem::new("Book studio", "Sam", 2).unwrap(),
            TaskItem::new("Write intro", "You", 1).unwrap(),
        ];
        doc.edit_milestone(0, MilestoneEdit { tasks: Some(tasks.clone()), ..Default::default() })
            .unwrap();
        assert_eq!(doc.milestones[0].tasks, tasks);
    }

    #[test]
    fn test_rejected_edit_leaves_plan_untouched() {
        let mut doc = plan();
        let before = doc.clone();

        let err = doc
            .edit_milestone(0, MilestoneEdit { due: Some("soon".to_string()), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, PlanEditError::Invalid(_)));

        let err = doc
            .edit_milestone(0, MilestoneEdit { tasks: Some(vec![]), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, PlanEditError::Invalid(_)));

        assert_eq!(doc, before);
    }

    #[test]
    fn test_edit_out_of_range() {
        let mut doc = plan();
        let err = doc.edit_milestone(9, MilestoneEdit::default()).unwrap_err();
        assert!(matches!(err, PlanEditError::NoSuchMilestone { number: 10, count: 3 }));
    }

    #[test]
    fn test_canonical_json_field_order() {
        let text = plan().to_canonical_json().unwrap();
        let milestones = text.find("\"milestones\"").unwrap();
        let metrics = text.find("\"success_metrics\"").unwrap();
        let risks = text.find("\"risks\"").unwrap();
        assert!(milestones < metrics && metrics < risks);
        assert!(text.contains("\"desc\""));
        assert!(!text.contains('\n'));
    }
}
