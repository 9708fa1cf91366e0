//! Store configuration.
//!
//! Defines the YAML-serializable configuration that tells every surface of
//! the quiz store where the database file lives and whether a fresh store is
//! seeded with the example question.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! database: data.sqlite3
//! seed_example: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Environment variable that overrides [`StoreConfig::database`].
pub const DATABASE_ENV: &str = "QUIZ_STORE_DB";

/// File name probed by [`StoreConfig::resolve`] when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "quiz-store.yml";

/// Database file used when nothing else is configured.
pub const DEFAULT_DATABASE: &str = "data.sqlite3";

fn default_version() -> String {
    "1.0".to_string()
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE)
}

fn default_seed_example() -> bool {
    true
}

/// Top-level store configuration.
///
/// Every field has a default, so an empty YAML document is a valid
/// configuration.
///
/// # Examples
///
/// ```
/// use quiz_store_db::StoreConfig;
///
/// let config: StoreConfig = serde_yaml::from_str("database: quiz.db").unwrap();
/// assert_eq!(config.database.to_str(), Some("quiz.db"));
/// assert!(config.seed_example);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Configuration format version (e.g., `"1.0"`).
    #[serde(default = "default_version")]
    pub version: String,
    /// Path of the SQLite database file.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Seed the example question when the store is created.
    #[serde(default = "default_seed_example")]
    pub seed_example: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            database: default_database(),
            seed_example: default_seed_example(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DatabaseError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::DatabaseError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Resolves the effective configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
    /// the working directory is used when present, otherwise the defaults.
    /// Finally the [`DATABASE_ENV`] variable, when set, overrides the
    /// database path.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };
        let env_database = std::env::var_os(DATABASE_ENV).map(PathBuf::from);
        Ok(config.with_database_override(env_database))
    }

    /// Replaces the database path when `database` is `Some`.
    pub fn with_database_override(mut self, database: Option<PathBuf>) -> Self {
        if let Some(database) = database {
            debug!(database = %database.display(), "Database path overridden");
            self.database = database;
        }
        self
    }
}
