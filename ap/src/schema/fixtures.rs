//! Well-formed service responses shared by unit tests

use serde_json::{Value, json};

pub fn research_json() -> Value {
    json!({
        "targets": [
            {"name": "CS freshmen", "why": "Looking for study habits"},
            {"name": "Bootcamp grads", "why": "Want interview prep"}
        ],
        "insights": ["Short episodes", "Weekly cadence", "Guest alumni", "Clips on social", "Clear CTA"],
        "risks": {"Low listenership": "Cross-promote in clubs", "Time crunch": "Batch record"},
        "references": [
            {"title": "Podcast guide", "url": "https://example.com/a"},
            {"title": "Audio basics", "url": "https://example.com/b"},
            {"title": "Growth tips", "url": "https://example.com/c"}
        ]
    })
}

pub fn plan_json() -> Value {
    json!({
        "milestones": [
            {
                "title": "Concept and format",
                "due": "2025-06-03",
                "tasks": [
                    {"desc": "Pick the show name", "effort_hrs": 1},
                    {"desc": "Outline first three episodes", "owner": "You", "effort_hrs": 3}
                ]
            },
            {
                "title": "Record pilot",
                "due": "2025-06-08",
                "tasks": [
                    {"desc": "Set up mic and software", "owner": "You", "effort_hrs": 2},
                    {"desc": "Record and edit episode 1", "owner": "You", "effort_hrs": 6}
                ]
            },
            {
                "title": "Launch",
                "due": "2025-06-14",
                "tasks": [
                    {"desc": "Publish to hosting", "owner": "You", "effort_hrs": 1},
                    {"desc": "Announce in CS clubs", "owner": "You", "effort_hrs": 2},
                    {"desc": "Post clips", "owner": "You", "effort_hrs": 2}
                ]
            }
        ],
        "success_metrics": ["100 downloads in week one", "3 episodes published"],
        "risks": [
            {"risk": "Guest cancels", "mitigation": "Keep a solo episode ready"},
            {"risk": "Audio issues", "mitigation": "Test record a day early"}
        ]
    })
}

pub fn assets_json() -> Value {
    json!({
        "launch_email": "Subject: Our podcast is live!\n\nHi there,\n\nEpisode 1 is out. Listen now.",
        "social_posts": [
            "New podcast for CS students - episode 1 out now!",
            "Struggling with algorithms? We talk study habits this week.",
            "Subscribe for weekly 20-minute episodes."
        ],
        "script_outline": "## Intro\n- Hook\n## Main\n- Topic\n## Outro\n- CTA",
        "weekly_checklist": "- [ ] Record\n- [ ] Edit\n- [ ] Publish"
    })
}
