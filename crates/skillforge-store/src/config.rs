use std::env;
use std::path::PathBuf;

/// Database file configuration.
///
/// Reads from the `SKILLFORGE_DB_PATH` environment variable, falling back
/// to `<data dir>/skillforge/skillforge.db` when unset.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
}

impl StoreConfig {
    /// Build a config from the environment.
    ///
    /// Priority: `SKILLFORGE_DB_PATH` env var, then the platform data dir.
    pub fn from_env() -> Self {
        let db_path = env::var("SKILLFORGE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_db_path());
        Self { db_path }
    }

    /// Build a config from an explicit path (useful for tests and CLI flags).
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// The default database location: `<data dir>/skillforge/skillforge.db`,
    /// with a current-directory fallback when no data dir can be resolved.
    pub fn default_db_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skillforge")
            .join("skillforge.db")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: Self::default_db_path(),
        }
    }
}
