//! Shared fixtures for skillforge integration tests.
//!
//! Everything here is storage-agnostic: tests that need a database get an
//! in-memory [`MemoryStore`], and the sample documents exercise the full
//! Markdown conventions (linked lines, unlinked lines, both colon
//! placements, prose to ignore).

use skillforge_store::MemoryStore;

/// Fresh empty in-memory store.
pub fn memory_store() -> MemoryStore {
    MemoryStore::new()
}

/// A two-week plan mixing linked and unlinked resource lines.
pub const SAMPLE_PLAN_MARKDOWN: &str = "\
# Training Plan for Alex Chen

## Week 1: Safety Fundamentals and Lockout Tagout
- **video:** Lockout Tagout Walkthrough (30 min)
- **pdf:** [Electrical Safety Standards](internal:electrical-safety)
- **interactive:** Lockout Tagout Practice Scenario (60 min)

## Week 2: Hydraulic Systems
- **Video**: Hydraulic Pump Fundamentals (30 min)
- **pdf:** Hydraulic Systems Maintenance Guide (45 min)

Review each week with your supervisor before moving on.
";

/// A worker profile in the TOML form the CLI reads.
pub const SAMPLE_PROFILE_TOML: &str = r#"
full_name = "Alex Chen"
current_role = "Maintenance Technician"
position = "Night shift, packaging line"
development_goal = "Move into a controls specialist role"
equipment_used = ["Siemens S7 PLC", "hydraulic press", "conveyor line"]
learning_style = "Visual"
language = "English"
target_months = 2
hours_per_week = "3-5"
preferred_schedule = "Two evenings per week"
mechanical = "intermediate"
electrical = "basic"
hydraulics = "none"
pneumatics = "basic"
controls = "none"
safety_ehs = "intermediate"
knowledge_source = "both"
"#;
