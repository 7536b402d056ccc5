//! Configuration file management.
//!
//! Provides a TOML-based config file at `~/.config/skillforge/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use skillforge_core::search::SearchConfig;
use skillforge_store::StoreConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub generator: GeneratorSection,
    pub search: SearchSection,
    pub storage: StorageSection,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    /// Default backend: "openai", "ollama" or "demo".
    pub backend: String,
    pub openai_endpoint: Option<String>,
    pub openai_api_key: Option<String>,
    pub ollama_url: Option<String>,
    pub ollama_model: Option<String>,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            backend: "demo".to_owned(),
            openai_endpoint: None,
            openai_api_key: None,
            ollama_url: None,
            ollama_model: None,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub youtube_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub db_path: Option<PathBuf>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the skillforge config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/skillforge` or
/// `~/.config/skillforge`. We intentionally ignore the platform-specific
/// `dirs::config_dir()` (which returns `~/Library/Application Support` on
/// macOS).
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("skillforge");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("skillforge")
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct SkillforgeConfig {
    pub store: StoreConfig,
    pub search: SearchConfig,
    pub backend: String,
    pub openai_endpoint: Option<String>,
    pub openai_api_key: Option<String>,
    pub ollama_url: Option<String>,
    pub ollama_model: Option<String>,
}

impl SkillforgeConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config
    /// file > default. The config file is optional; everything has a
    /// working default so `skillforge generate` runs out of the box.
    pub fn resolve(cli_db_path: Option<&str>, cli_backend: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        // DB path resolution.
        let store = if let Some(path) = cli_db_path {
            StoreConfig::new(PathBuf::from(path))
        } else if let Ok(path) = std::env::var("SKILLFORGE_DB_PATH") {
            StoreConfig::new(PathBuf::from(path))
        } else if let Some(path) = file_config
            .as_ref()
            .and_then(|cfg| cfg.storage.db_path.clone())
        {
            StoreConfig::new(path)
        } else {
            StoreConfig::from_env()
        };

        // Backend resolution.
        let backend = if let Some(name) = cli_backend {
            name.to_owned()
        } else if let Ok(name) = std::env::var("SKILLFORGE_GENERATOR") {
            name
        } else if let Some(ref cfg) = file_config {
            cfg.generator.backend.clone()
        } else {
            GeneratorSection::default().backend
        };

        // Search keys: env wins over the file, per key.
        let mut search = SearchConfig::from_env();
        if let Some(ref cfg) = file_config {
            if search.youtube_api_key.is_none() {
                search.youtube_api_key = cfg.search.youtube_api_key.clone();
            }
            if search.google_api_key.is_none() {
                search.google_api_key = cfg.search.google_api_key.clone();
            }
            if search.google_cse_id.is_none() {
                search.google_cse_id = cfg.search.google_cse_id.clone();
            }
        }

        let openai_api_key = std::env::var("SKILLFORGE_OPENAI_API_KEY")
            .ok()
            .or_else(|| file_config.as_ref().and_then(|c| c.generator.openai_api_key.clone()));

        let (openai_endpoint, ollama_url, ollama_model) = match file_config {
            Some(cfg) => (
                cfg.generator.openai_endpoint,
                cfg.generator.ollama_url,
                cfg.generator.ollama_model,
            ),
            None => (None, None, None),
        };

        Ok(Self {
            store,
            search,
            backend,
            openai_endpoint,
            openai_api_key,
            ollama_url,
            ollama_model,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
