//! Built-in briefs

use tracing::debug;

use crate::pipeline::Brief;

/// A named starting brief
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub goal: &'static str,
    pub audience: &'static str,
    pub constraints: &'static str,
}

impl Preset {
    pub fn brief(&self) -> Brief {
        Brief::new(self.goal, self.audience, self.constraints)
    }
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "podcast",
        goal: "Launch a podcast in 2 weeks",
        audience: "aspiring CS students",
        constraints: "low budget; weekly episodes; concise; 3 milestones max",
    },
    Preset {
        name: "workshop",
        goal: "Plan a 1-day AI workshop in 10 days",
        audience: "high-school students",
        constraints: "budget < $200; 25 attendees; include consent forms",
    },
    Preset {
        name: "landing",
        goal: "Ship a product landing page in 5 days",
        audience: "early adopters of a task manager app",
        constraints: "no-code tools; mobile-first; 5 sections max",
    },
];

/// Look up a preset by name (case-insensitive)
pub fn find(name: &str) -> Option<&'static Preset> {
    debug!(%name, "presets::find: called");
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

/// Names of all presets, for help text
pub fn names() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.name).collect()
}
