mod backend;
mod catalog_cmd;
mod config;
mod eval_cmds;
mod plan_cmds;

use std::path::PathBuf;

use anyhow::bail;
use chrono::Utc;
use clap::{Parser, Subcommand};

use skillforge_core::generate::{OllamaGenerator, OllamaStatus};
use skillforge_core::model::{KnowledgeSource, ResourceKind, UploadedDocument};
use skillforge_store::{KeyValueStore, MemoryStore, SqliteStore};

use config::SkillforgeConfig;

#[derive(Parser)]
#[command(name = "skillforge", about = "Personalized industrial training plans")]
struct Cli {
    /// Database file path (overrides SKILLFORGE_DB_PATH env var)
    #[arg(long, global = true)]
    db_path: Option<String>,

    /// Use a throwaway in-memory store instead of the database
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a skillforge config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate a training plan from a worker profile
    Generate {
        /// Path to the profile TOML file
        profile: PathBuf,
        /// Generator backend: demo, ollama, or openai
        #[arg(long)]
        generator: Option<String>,
        /// Skip resource enrichment
        #[arg(long)]
        no_enrich: bool,
        /// Write the plan Markdown to a file instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Resolve links for bare resource mentions in a plan
    Enrich {
        /// Markdown plan file (defaults to the stored plan)
        file: Option<PathBuf>,
        /// Where links may come from: internal, public, or both
        #[arg(long, default_value = "both")]
        knowledge_source: KnowledgeSource,
        /// Write the enriched Markdown to a file instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show a plan week by week (stored plan, or a Markdown file)
    Show {
        /// Markdown plan file (defaults to the stored plan)
        file: Option<PathBuf>,
    },
    /// Ask the tutor a question about the current plan
    Tutor {
        /// The question to ask
        message: String,
        /// Generator backend: demo, ollama, or openai
        #[arg(long)]
        generator: Option<String>,
    },
    /// Set or clear a resource's completed flag in the stored plan
    Complete {
        /// Resource id as shown by `skillforge show` (e.g. "2-1")
        resource_id: String,
        /// Clear the flag instead of setting it
        #[arg(long)]
        undo: bool,
    },
    /// Resource catalog management
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// List previously generated plans
    History {
        /// Maximum number of entries to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Evaluation results
    Eval {
        #[command(subcommand)]
        command: EvalCommands,
    },
    /// Check whether a local Ollama daemon is reachable
    OllamaStatus,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all catalog entries
    List {
        /// Only show entries of this kind: video, pdf, or interactive
        #[arg(long)]
        kind: Option<ResourceKind>,
    },
    /// Show what the matcher would pick for a query
    Search {
        /// Resource title to match
        query: String,
        /// Constrain the match to this kind
        #[arg(long)]
        kind: Option<ResourceKind>,
    },
    /// Register an uploaded internal document
    AddDoc {
        /// Document title
        title: String,
        /// Comma-separated topic words
        #[arg(long)]
        topics: String,
        /// Short description
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand)]
pub enum EvalCommands {
    /// Record a completed module evaluation
    Submit {
        /// Module (week) title the evaluation belongs to
        module: String,
        /// Employee name
        #[arg(long)]
        name: String,
        /// Score, 0-100
        #[arg(long)]
        score: u8,
        /// Answers given, one per flag occurrence
        #[arg(long = "answer")]
        answers: Vec<String>,
    },
    /// Show aggregate evaluation statistics
    Stats,
}

/// Execute `skillforge init`: write a default config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();
    if path.exists() && !force {
        bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }
    config::save_config(&config::ConfigFile::default())?;
    println!("Config written to {}", path.display());
    println!("Edit it to set a generator backend and search API keys.");
    Ok(())
}

async fn cmd_add_doc(
    store: &dyn KeyValueStore,
    title: String,
    topics: String,
    description: String,
) -> anyhow::Result<()> {
    let id: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let mut documents = catalog_cmd::load_uploaded_documents(store).await?;
    documents.push(UploadedDocument {
        id: id.clone(),
        title,
        topics: topics
            .split(',')
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect(),
        description,
        uploaded_at: Utc::now(),
    });
    catalog_cmd::save_uploaded_documents(store, &documents).await?;
    println!("Registered internal document {id}");
    Ok(())
}

async fn open_store(
    config: &SkillforgeConfig,
    ephemeral: bool,
) -> anyhow::Result<Box<dyn KeyValueStore>> {
    if ephemeral {
        Ok(Box::new(MemoryStore::new()))
    } else {
        Ok(Box::new(SqliteStore::connect(&config.store).await?))
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { force } => cmd_init(force),
        Commands::Generate {
            profile,
            generator,
            no_enrich,
            output,
        } => {
            let config = SkillforgeConfig::resolve(cli.db_path.as_deref(), generator.as_deref())?;
            let store = open_store(&config, cli.ephemeral).await?;
            let backend_name = config.backend.clone();
            plan_cmds::cmd_generate(
                &config,
                store.as_ref(),
                &profile,
                &backend_name,
                no_enrich,
                output.as_deref(),
            )
            .await
        }
        Commands::Enrich {
            file,
            knowledge_source,
            output,
        } => {
            let config = SkillforgeConfig::resolve(cli.db_path.as_deref(), None)?;
            let store = open_store(&config, cli.ephemeral).await?;
            plan_cmds::cmd_enrich(
                &config,
                store.as_ref(),
                file.as_deref(),
                knowledge_source,
                output.as_deref(),
            )
            .await
        }
        Commands::Show { file } => {
            let config = SkillforgeConfig::resolve(cli.db_path.as_deref(), None)?;
            let store = open_store(&config, cli.ephemeral).await?;
            plan_cmds::cmd_show(store.as_ref(), file.as_deref()).await
        }
        Commands::Tutor { message, generator } => {
            let config = SkillforgeConfig::resolve(cli.db_path.as_deref(), generator.as_deref())?;
            let store = open_store(&config, cli.ephemeral).await?;
            let generator = backend::build_generator(&config, &config.backend)?;
            plan_cmds::cmd_tutor(store.as_ref(), generator.as_ref(), &message).await
        }
        Commands::Complete { resource_id, undo } => {
            let config = SkillforgeConfig::resolve(cli.db_path.as_deref(), None)?;
            let store = open_store(&config, cli.ephemeral).await?;
            plan_cmds::cmd_complete(store.as_ref(), &resource_id, undo).await
        }
        Commands::Catalog { command } => {
            let config = SkillforgeConfig::resolve(cli.db_path.as_deref(), None)?;
            let store = open_store(&config, cli.ephemeral).await?;
            match command {
                CatalogCommands::List { kind } => {
                    catalog_cmd::cmd_list(store.as_ref(), kind).await
                }
                CatalogCommands::Search { query, kind } => {
                    catalog_cmd::cmd_search(store.as_ref(), &query, kind).await
                }
                CatalogCommands::AddDoc {
                    title,
                    topics,
                    description,
                } => cmd_add_doc(store.as_ref(), title, topics, description).await,
            }
        }
        Commands::History { limit } => {
            let config = SkillforgeConfig::resolve(cli.db_path.as_deref(), None)?;
            let store = open_store(&config, cli.ephemeral).await?;
            plan_cmds::cmd_history(store.as_ref(), limit).await
        }
        Commands::Eval { command } => {
            let config = SkillforgeConfig::resolve(cli.db_path.as_deref(), None)?;
            let store = open_store(&config, cli.ephemeral).await?;
            match command {
                EvalCommands::Submit {
                    module,
                    name,
                    score,
                    answers,
                } => eval_cmds::cmd_submit(store.as_ref(), module, name, score, answers).await,
                EvalCommands::Stats => eval_cmds::cmd_stats(store.as_ref()).await,
            }
        }
        Commands::OllamaStatus => {
            let config = SkillforgeConfig::resolve(cli.db_path.as_deref(), None)?;
            let generator =
                OllamaGenerator::new(config.ollama_url.clone(), config.ollama_model.clone());
            match generator.check_status().await {
                OllamaStatus::Available { models } => {
                    println!("Ollama is running. {} model(s) available:", models.len());
                    for model in models {
                        println!("  {model}");
                    }
                }
                OllamaStatus::Unavailable { reason } => {
                    println!("Ollama is not reachable: {reason}");
                }
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
    Ok(())
}
