//! Offline demo generator.
//!
//! Produces deterministic, fully parseable plans from the profile alone,
//! so the tool works end to end with no API keys and no local daemon.
//! Tutor replies are canned and picked at random.

use anyhow::Result;
use async_trait::async_trait;
use rand::seq::IndexedRandom;

use crate::model::{ResourceKind, WorkerProfile};

use super::Generator;

/// Week focus titles cycled through the plan.
const WEEK_TOPICS: [&str; 8] = [
    "Safety Fundamentals and Lockout Tagout",
    "Equipment Orientation and Documentation",
    "Electrical Systems Basics",
    "Mechanical Systems and Lubrication",
    "Hydraulics and Pneumatics",
    "PLC and Controls Introduction",
    "Preventive Maintenance Practice",
    "Troubleshooting Methods",
];

const TUTOR_REPLIES: [&str; 4] = [
    "Good question. Check the resources in your current week first; they cover exactly that.",
    "That topic comes up later in your plan. For now, focus on the fundamentals in this week's material.",
    "In practice, always verify lockout tagout before touching the equipment. The safety module in week one walks through it.",
    "Try the interactive resource for this week, then come back if anything is still unclear.",
];

/// The offline [`Generator`].
#[derive(Debug, Default)]
pub struct DemoGenerator;

impl DemoGenerator {
    pub fn new() -> Self {
        Self
    }
}

/// Resource mix for one demo week, honoring the learning style the same
/// way the real prompts ask the model to.
fn week_kinds(learning_style: &str) -> [ResourceKind; 3] {
    use ResourceKind::{Interactive, Pdf, Video};
    let lower = learning_style.to_lowercase();
    if lower.contains("visual") {
        [Video, Video, Pdf]
    } else if lower.contains("read") || lower.contains("writ") {
        [Pdf, Pdf, Video]
    } else if lower.contains("kinesthetic") || lower.contains("hands") {
        [Interactive, Video, Pdf]
    } else {
        [Video, Pdf, Interactive]
    }
}

fn duration_for(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Video => "30 min",
        ResourceKind::Pdf => "45 min",
        ResourceKind::Interactive => "60 min",
    }
}

#[async_trait]
impl Generator for DemoGenerator {
    fn name(&self) -> &str {
        "demo"
    }

    async fn generate_plan(&self, profile: &WorkerProfile) -> Result<String> {
        let name = if profile.full_name.is_empty() {
            "the employee"
        } else {
            &profile.full_name
        };
        let mut markdown = format!("# Training Plan for {name}\n\n");

        let kinds = week_kinds(&profile.learning_style);
        for week in 1..=profile.total_weeks() {
            let topic = WEEK_TOPICS[((week - 1) as usize) % WEEK_TOPICS.len()];
            markdown.push_str(&format!("## Week {week}: {topic}\n"));
            for kind in kinds {
                let flavor = match kind {
                    ResourceKind::Video => "Overview",
                    ResourceKind::Pdf => "Reference Guide",
                    ResourceKind::Interactive => "Practice Exercise",
                };
                markdown.push_str(&format!(
                    "- **{kind}:** {topic} {flavor} ({})\n",
                    duration_for(kind)
                ));
            }
            markdown.push('\n');
        }
        Ok(markdown)
    }

    async fn generate_content(&self, _prompt: &str) -> Result<String> {
        // Content synthesis has its own offline fallback; the demo backend
        // defers to it by returning nothing useful.
        Ok(String::new())
    }

    async fn tutor_reply(&self, _message: &str, _context: &str) -> Result<String> {
        let mut rng = rand::rng();
        let reply = TUTOR_REPLIES
            .choose(&mut rng)
            .copied()
            .unwrap_or(TUTOR_REPLIES[0]);
        Ok(reply.to_owned())
    }
}
