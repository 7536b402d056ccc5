//! Plan commands: generate, enrich, show, tutor, complete, history.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;

use skillforge_core::generate::Generator;
use skillforge_core::model::{
    KnowledgeSource, PlanRecord, ResourceLink, TrainingPlan, WorkerProfile,
};
use skillforge_core::plan::{self, parser};
use skillforge_store::KeyValueStore;

use crate::backend;
use crate::catalog_cmd::load_uploaded_documents;
use crate::config::SkillforgeConfig;

/// Load and parse a worker profile TOML file.
pub fn load_profile(path: &Path) -> Result<WorkerProfile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile file at {}", path.display()))?;
    let profile: WorkerProfile =
        toml::from_str(&contents).context("failed to parse profile file")?;
    if profile.full_name.trim().is_empty() {
        bail!("profile is missing full_name");
    }
    Ok(profile)
}

/// Execute `skillforge generate`.
pub async fn cmd_generate(
    config: &SkillforgeConfig,
    store: &dyn KeyValueStore,
    profile_path: &Path,
    backend_name: &str,
    no_enrich: bool,
    output: Option<&Path>,
) -> Result<()> {
    let profile = load_profile(profile_path)?;

    println!(
        "Generating a {}-week plan for {} with the {backend_name} backend...",
        profile.total_weeks(),
        profile.full_name
    );
    let generator = backend::build_generator(config, backend_name)?;
    let mut markdown = generator
        .generate_plan(&profile)
        .await
        .context("plan generation failed")?;

    if no_enrich {
        println!("Skipping enrichment (--no-enrich).");
    } else {
        let uploaded = load_uploaded_documents(store).await?;
        let enricher = backend::build_enricher(config, backend_name, &uploaded)?;
        markdown = enricher.enrich(&markdown, &profile).await;
    }

    let weeks = parser::parse(&markdown);
    if weeks.is_empty() {
        bail!("the generated plan contained no recognizable weeks; try another backend");
    }

    let training_plan = TrainingPlan {
        weeks,
        source_markdown: markdown.clone(),
    };
    plan::save_current_plan(store, &training_plan).await?;
    plan::append_history(
        store,
        &PlanRecord {
            generated_at: Utc::now(),
            generator: backend_name.to_owned(),
            profile_name: profile.full_name.clone(),
            markdown: markdown.clone(),
        },
    )
    .await?;

    match output {
        Some(path) => {
            std::fs::write(path, &markdown)
                .with_context(|| format!("failed to write plan to {}", path.display()))?;
            println!("Plan written to {}", path.display());
        }
        None => print_plan(&training_plan),
    }
    Ok(())
}

/// Execute `skillforge enrich`: rewrite bare mentions in an existing
/// Markdown file (or the stored plan when no file is given).
pub async fn cmd_enrich(
    config: &SkillforgeConfig,
    store: &dyn KeyValueStore,
    file: Option<&Path>,
    source: KnowledgeSource,
    output: Option<&Path>,
) -> Result<()> {
    let markdown = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read plan file at {}", path.display()))?,
        None => match plan::load_current_plan(store).await? {
            Some(stored) => stored.source_markdown,
            None => bail!("no stored plan; pass a Markdown file or run `skillforge generate`"),
        },
    };

    // Enrichment needs only the knowledge-source preference from the
    // profile; the rest stays at defaults.
    let profile = WorkerProfile {
        knowledge_source: source,
        ..WorkerProfile::default()
    };
    let uploaded = load_uploaded_documents(store).await?;
    let enricher = backend::build_enricher(config, &config.backend, &uploaded)?;
    let enriched = enricher.enrich(&markdown, &profile).await;

    let weeks = parser::parse(&enriched);
    let training_plan = TrainingPlan {
        weeks,
        source_markdown: enriched.clone(),
    };
    plan::save_current_plan(store, &training_plan).await?;

    match output {
        Some(path) => {
            std::fs::write(path, &enriched)
                .with_context(|| format!("failed to write plan to {}", path.display()))?;
            println!("Enriched plan written to {}", path.display());
        }
        None => print!("{enriched}"),
    }
    Ok(())
}

/// Execute `skillforge show`: display the stored plan (or a file) week by
/// week.
pub async fn cmd_show(store: &dyn KeyValueStore, file: Option<&Path>) -> Result<()> {
    let training_plan = match file {
        Some(path) => {
            let markdown = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read plan file at {}", path.display()))?;
            TrainingPlan {
                weeks: parser::parse(&markdown),
                source_markdown: markdown,
            }
        }
        None => match plan::load_current_plan(store).await? {
            Some(stored) => stored,
            None => bail!("no stored plan; run `skillforge generate` first"),
        },
    };
    if training_plan.weeks.is_empty() {
        bail!("the plan contains no recognizable weeks");
    }
    print_plan(&training_plan);
    Ok(())
}

/// Ask the generator a tutoring question, with the stored plan (when one
/// exists) as context.
async fn tutor_reply_for_plan(
    store: &dyn KeyValueStore,
    generator: &dyn Generator,
    message: &str,
) -> Result<String> {
    let context = match plan::load_current_plan(store).await? {
        Some(stored) => stored.source_markdown,
        None => String::new(),
    };
    generator
        .tutor_reply(message, &context)
        .await
        .context("tutor request failed")
}

/// Execute `skillforge tutor`.
pub async fn cmd_tutor(
    store: &dyn KeyValueStore,
    generator: &dyn Generator,
    message: &str,
) -> Result<()> {
    let reply = tutor_reply_for_plan(store, generator, message).await?;
    println!("{reply}");
    Ok(())
}

/// Execute `skillforge complete`: set or clear a resource's completed
/// flag in the stored plan.
pub async fn cmd_complete(
    store: &dyn KeyValueStore,
    resource_id: &str,
    undo: bool,
) -> Result<()> {
    let Some(mut training_plan) = plan::load_current_plan(store).await? else {
        bail!("no stored plan; run `skillforge generate` first");
    };

    let mut title = None;
    for week in &mut training_plan.weeks {
        for resource in &mut week.resources {
            if resource.id == resource_id {
                resource.completed = !undo;
                title = Some(resource.title.clone());
            }
        }
    }
    let Some(title) = title else {
        bail!("no resource with id {resource_id:?}; run `skillforge show` to list ids");
    };

    plan::save_current_plan(store, &training_plan).await?;
    println!(
        "Marked {resource_id} ({title}) as {}",
        if undo { "not completed" } else { "completed" }
    );
    Ok(())
}

/// Execute `skillforge history`.
pub async fn cmd_history(store: &dyn KeyValueStore, limit: usize) -> Result<()> {
    let history = plan::load_history(store).await?;
    if history.is_empty() {
        println!("No plans generated yet.");
        return Ok(());
    }
    println!("{} plan(s) generated:", history.len());
    for record in history.iter().rev().take(limit) {
        println!(
            "  {}  {:8}  {}",
            record.generated_at.format("%Y-%m-%d %H:%M"),
            record.generator,
            record.profile_name
        );
    }
    Ok(())
}

fn print_plan(training_plan: &TrainingPlan) {
    for week in &training_plan.weeks {
        println!("Week {}: {}", week.number, week.title);
        for resource in &week.resources {
            let marker = if resource.completed { "x" } else { " " };
            let location = match &resource.link {
                ResourceLink::None => "(unlinked)".to_owned(),
                ResourceLink::GeneratedInline(_) => "(generated content)".to_owned(),
                ResourceLink::InternalRef(id) => format!("(internal: {id})"),
                link => link
                    .watch_url()
                    .or_else(|| link.as_url())
                    .unwrap_or_default(),
            };
            println!(
                "  [{marker}] {:12} {} [{}] {location}",
                format!("{}:", resource.kind),
                resource.title,
                resource.duration_label
            );
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillforge_core::generate::DemoGenerator;
    use skillforge_test_utils::{SAMPLE_PLAN_MARKDOWN, SAMPLE_PROFILE_TOML, memory_store};

    #[test]
    fn load_profile_reads_a_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(&path, SAMPLE_PROFILE_TOML).unwrap();

        let profile = load_profile(&path).unwrap();
        assert_eq!(profile.full_name, "Alex Chen");
        assert_eq!(profile.total_weeks(), 8);
    }

    #[test]
    fn load_profile_rejects_missing_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(&path, "current_role = \"Technician\"\n").unwrap();

        assert!(load_profile(&path).is_err());
    }

    async fn store_sample_plan(store: &dyn KeyValueStore) {
        let training_plan = TrainingPlan {
            weeks: parser::parse(SAMPLE_PLAN_MARKDOWN),
            source_markdown: SAMPLE_PLAN_MARKDOWN.to_owned(),
        };
        plan::save_current_plan(store, &training_plan).await.unwrap();
    }

    #[tokio::test]
    async fn tutor_answers_with_and_without_a_stored_plan() {
        let store = memory_store();
        let generator = DemoGenerator::new();

        let without = tutor_reply_for_plan(&store, &generator, "What is a PLC?")
            .await
            .unwrap();
        assert!(!without.is_empty());

        store_sample_plan(&store).await;
        let with = tutor_reply_for_plan(&store, &generator, "What is a PLC?")
            .await
            .unwrap();
        assert!(!with.is_empty());
    }

    #[tokio::test]
    async fn complete_toggles_and_persists_the_flag() {
        let store = memory_store();
        store_sample_plan(&store).await;

        cmd_complete(&store, "1-1", false).await.unwrap();
        let stored = plan::load_current_plan(&store).await.unwrap().unwrap();
        let resource = &stored.weeks[0].resources[0];
        assert_eq!(resource.id, "1-1");
        assert!(resource.completed);

        cmd_complete(&store, "1-1", true).await.unwrap();
        let stored = plan::load_current_plan(&store).await.unwrap().unwrap();
        assert!(!stored.weeks[0].resources[0].completed);
    }

    #[tokio::test]
    async fn complete_rejects_unknown_ids() {
        let store = memory_store();
        store_sample_plan(&store).await;
        assert!(cmd_complete(&store, "9-9", false).await.is_err());
    }
}
