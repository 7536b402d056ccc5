//! Prompt construction for the generation backends.
//!
//! Pure string assembly, no I/O. The plan prompt is the contract that
//! makes generator output parseable: it pins the `## Week N: Title`
//! structure and the `**kind:** Title (duration)` resource lines the
//! parser and enricher both understand.

use crate::model::{ResourceKind, WorkerProfile};

// ---------------------------------------------------------------------------
// System prompts
// ---------------------------------------------------------------------------

/// Role instruction for plan generation.
pub const PLAN_SYSTEM_PROMPT: &str = "You are an expert industrial training coordinator. \
     You design personalized, week-by-week technical training plans for \
     manufacturing and maintenance employees. You write practical, \
     safety-conscious plans grounded in real industrial equipment.";

/// Role instruction for study-content generation.
pub const CONTENT_SYSTEM_PROMPT: &str = "You are a technical writer producing self-contained study material \
     for industrial maintenance training. Write clear, structured documents \
     a technician can learn from without additional resources.";

/// Role instruction for the tutoring assistant.
pub const TUTOR_SYSTEM_PROMPT: &str = "You are a friendly industrial-training tutor. Answer questions about \
     the employee's current training plan concisely and practically. When \
     the question is outside the plan, relate your answer back to it.";

/// Output-format rules included verbatim in every plan prompt.
const PLAN_FORMAT_RULES: &str = r"## Output Format

Produce ONLY Markdown in this exact structure:

```
# Training Plan for <name>

## Week 1: <focus title>
- **video:** <resource title> (30 min)
- **pdf:** <resource title> (45 min)

## Week 2: <focus title>
...
```

Rules:
1. Every week heading MUST be `## Week <number>: <title>` with an arabic
   week number. No other heading style is recognized.
2. Every resource line MUST start with `- **video:**`, `- **pdf:**` or
   `- **interactive:**` followed by a descriptive title. Do not include
   URLs; links are resolved afterwards.
3. Give each resource an estimated duration in parentheses.
4. 2-4 resources per week.
";

// ---------------------------------------------------------------------------
// Prompt builders
// ---------------------------------------------------------------------------

/// Build the plan-generation prompt from a worker profile.
///
/// Priority order for plan focus: development goal, then equipment used,
/// then the current role, then skill gaps.
pub fn build_plan_prompt(profile: &WorkerProfile) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(&format!(
        "Create a {}-week technical training plan for the following employee.\n\n",
        profile.total_weeks()
    ));

    prompt.push_str("## Employee Profile\n\n");
    prompt.push_str(&format!("- **Name:** {}\n", profile.full_name));
    prompt.push_str(&format!("- **Current role:** {}\n", profile.current_role));
    prompt.push_str(&format!("- **Position:** {}\n", profile.position));
    prompt.push_str(&format!(
        "- **Development goal:** {}\n",
        profile.development_goal
    ));
    if !profile.equipment_used.is_empty() {
        prompt.push_str(&format!(
            "- **Equipment used:** {}\n",
            profile.equipment_used.join(", ")
        ));
    }
    prompt.push_str(&format!(
        "- **Priority skill areas:** {}\n",
        profile.priority_skills()
    ));

    prompt.push_str("\n## Plan Requirements\n\n");
    prompt.push_str(&format!(
        "1. Exactly {} weeks ({} months, four weeks per month).\n",
        profile.total_weeks(),
        profile.target_months.max(1)
    ));
    prompt.push_str(&format!(
        "2. Around {} hours of material per week ({} schedule: {}).\n",
        profile.hours_lower_bound(),
        profile.hours_per_week,
        profile.preferred_schedule
    ));
    prompt.push_str(&format!(
        "3. {}\n",
        learning_style_guideline(&profile.learning_style)
    ));
    prompt.push_str(&format!(
        "4. Write all titles and text in {}.\n",
        profile.content_language()
    ));
    prompt.push_str(
        "5. Order the weeks by priority: the development goal first, then the \
         equipment the employee works with, then role fundamentals, then the \
         listed skill gaps.\n",
    );

    prompt.push('\n');
    prompt.push_str(PLAN_FORMAT_RULES);
    prompt
}

/// Resource-mix instruction derived from the employee's learning style.
fn learning_style_guideline(style: &str) -> String {
    let lower = style.to_lowercase();
    if lower.contains("visual") {
        "Favor video resources (roughly two videos for every document); the employee is a visual learner.".to_owned()
    } else if lower.contains("read") || lower.contains("writ") {
        "Favor written material (roughly two documents for every video); the employee learns best by reading.".to_owned()
    } else if lower.contains("kinesthetic") || lower.contains("hands") {
        "Favor interactive resources and include at least one per week; the employee learns by doing.".to_owned()
    } else {
        "Balance video, document and interactive resources evenly.".to_owned()
    }
}

/// Build the study-content prompt for a synthesized resource.
///
/// Each kind gets its own section structure; the document prompt mirrors
/// the structure the fallback template produces so both tiers read alike.
pub fn build_content_prompt(
    title: &str,
    kind: ResourceKind,
    topic: &str,
    profile: &WorkerProfile,
) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(&format!(
        "Write a self-contained training document titled {title:?} on the \
         topic of {topic} for an industrial maintenance employee ({}).\n",
        profile.current_role
    ));
    prompt.push_str(&format!(
        "Write it in {}.\n",
        profile.content_language()
    ));
    if !profile.learning_style.is_empty() {
        prompt.push_str(&format!(
            "The employee's learning style is {}; shape examples accordingly.\n",
            profile.learning_style
        ));
    }
    if !profile.equipment_used.is_empty() {
        prompt.push_str(&format!(
            "Ground examples in the equipment they work with: {}.\n",
            profile.equipment_used.join(", ")
        ));
    }
    prompt.push('\n');

    match kind {
        ResourceKind::Pdf => {
            prompt.push_str(
                "Structure the document with exactly these Markdown sections:\n\
                 ## Overview\n\
                 ## Key Concepts\n\
                 ## Practical Applications\n\
                 ## Safety Considerations\n\
                 ## Step-by-Step Procedures\n\
                 ## Troubleshooting Guide\n\
                 ## Best Practices\n\
                 ## Summary\n",
            );
        }
        ResourceKind::Video => {
            prompt.push_str(
                "Write it as a narrated video script: an introduction, 3-5 \
                 demonstration segments with what the camera shows, and a recap. \
                 Mark each segment with a timestamp.\n",
            );
        }
        ResourceKind::Interactive => {
            prompt.push_str(
                "Write it as a hands-on exercise worksheet: a scenario, required \
                 tools, numbered steps the employee performs, checkpoints to \
                 verify, and reflection questions at the end.\n",
            );
        }
    }
    prompt
}

/// Build the tutoring prompt: the question plus the current plan.
pub fn build_tutor_prompt(message: &str, plan_context: &str) -> String {
    if plan_context.trim().is_empty() {
        format!("The employee has no training plan yet.\n\nQuestion: {message}")
    } else {
        format!(
            "The employee's current training plan:\n\n{plan_context}\n\nQuestion: {message}"
        )
    }
}
