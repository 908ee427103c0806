//! Milestone calendar export

use icalendar::{Calendar, Component, Event, EventLike};
use tracing::debug;

use crate::schema::PlanDoc;

use super::DeliveryError;

pub const CALENDAR_FILE_NAME: &str = "milestones.ics";

/// One all-day event per milestone, titled `Milestone N: {title}`
pub fn milestones_ics(plan: &PlanDoc) -> Result<String, DeliveryError> {
    debug!(milestones = plan.milestones.len(), "milestones_ics: called");
    let mut calendar = Calendar::new();
    for (i, milestone) in plan.milestones.iter().enumerate() {
        let number = i + 1;
        let date = milestone.due_date().ok_or_else(|| DeliveryError::InvalidDueDate {
            number,
            title: milestone.title.clone(),
            due: milestone.due.clone(),
        })?;
        let event = Event::new()
            .summary(&format!("Milestone {}: {}", number, milestone.title))
            .all_day(date)
            .done();
        calendar.push(event);
    }
    Ok(calendar.done().to_string())
}
