//! Store configuration.
//!
//! Names the SQLite database file and toggles the statement echo. Loadable
//! from YAML so a harness can keep its settings next to the database.
//!
//! # Example YAML
//!
//! ```yaml
//! database_path: data/employees.db
//! echo_sql: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Database file used when nothing else is configured.
pub const DEFAULT_DATABASE_PATH: &str = "lite-orm.db";

/// Connection target and diagnostics for a [`SqliteStore`](crate::SqliteStore).
///
/// # Examples
///
/// ```
/// use lite_orm_sqlite::StoreConfig;
///
/// let config = StoreConfig::new("employees.db").with_echo_sql(true);
/// assert!(config.echo_sql);
/// assert_eq!(config.database_path.to_str(), Some("employees.db"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the SQLite database file. Created on first connect.
    pub database_path: PathBuf,
    /// Emit every generated statement at `info` level before it runs.
    pub echo_sql: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            echo_sql: false,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration for the given database file.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Self::default()
        }
    }

    /// Overrides the database file.
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Toggles the statement echo.
    pub fn with_echo_sql(mut self, enabled: bool) -> Self {
        self.echo_sql = enabled;
        self
    }

    /// Loads configuration from a YAML file. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::OrmError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::OrmError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::OrmError::Io) if the file cannot be written, or
    /// [`Yaml`](crate::OrmError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_working_directory() {
        let config = StoreConfig::default();
        assert_eq!(config.database_path, PathBuf::from("lite-orm.db"));
        assert!(!config.echo_sql);
    }

    #[test]
    fn test_deserialize_complete() {
        let yaml = "database_path: data/staff.db\necho_sql: true\n";
        let config: StoreConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database_path, PathBuf::from("data/staff.db"));
        assert!(config.echo_sql);
    }

    #[test]
    fn test_deserialize_partial_uses_defaults() {
        let config: StoreConfig = serde_yaml::from_str("echo_sql: true\n").unwrap();
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert!(config.echo_sql);
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.yml");

        let original = StoreConfig::new(dir.path().join("orm.db")).with_echo_sql(true);
        original.save(&path).unwrap();

        let loaded = StoreConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = StoreConfig::load(dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, crate::OrmError::Io(_)));
    }
}
