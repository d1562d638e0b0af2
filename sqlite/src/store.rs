//! Statement execution against a SQLite database file.
//!
//! [`SqliteStore`] opens a fresh connection for every call and closes it on
//! return. There is no pool and no transaction spans more than one
//! statement. Each statement is echoed through `tracing` under the
//! [`SQL_TARGET`] target before it runs.

use std::path::PathBuf;

use lite_orm_core::Record;
use rusqlite::{Connection, params_from_iter};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::convert::{Param, rows_to_records};
use crate::error::Result;
use crate::statement::Statement;

/// Tracing target of the statement echo.
pub const SQL_TARGET: &str = "lite_orm::sql";

/// Executes generated statements against one database file.
#[derive(Debug, Clone, Default)]
pub struct SqliteStore {
    config: StoreConfig,
}

impl SqliteStore {
    /// Creates a store from a configuration.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Creates a store for a database file with default settings.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::new(path))
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Opens a new connection to the configured database file.
    ///
    /// The file is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Store`](crate::OrmError::Store) if the file cannot be opened.
    pub fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.config.database_path)?)
    }

    fn echo(&self, statement: &Statement) {
        if self.config.echo_sql {
            info!(target: SQL_TARGET, "{statement}");
        } else {
            debug!(target: SQL_TARGET, "{statement}");
        }
    }

    /// Runs a statement that returns no rows and reports the affected row
    /// count.
    ///
    /// # Errors
    ///
    /// Returns [`Store`](crate::OrmError::Store) if the store rejects the
    /// statement.
    pub fn execute(&self, statement: &Statement) -> Result<usize> {
        self.echo(statement);
        let conn = self.connect()?;
        let changed = conn.execute(
            &statement.sql,
            params_from_iter(statement.params.iter().map(Param)),
        )?;
        Ok(changed)
    }

    /// Runs an `INSERT` and returns the row id the store assigned.
    ///
    /// # Errors
    ///
    /// Returns [`Store`](crate::OrmError::Store) if the store rejects the
    /// statement.
    pub fn insert(&self, statement: &Statement) -> Result<i64> {
        self.echo(statement);
        let conn = self.connect()?;
        conn.execute(
            &statement.sql,
            params_from_iter(statement.params.iter().map(Param)),
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Runs a query and maps every row onto a new `R`.
    ///
    /// # Errors
    ///
    /// Returns [`Store`](crate::OrmError::Store) if the store rejects the
    /// statement or a column value cannot be decoded into its field.
    pub fn query<R: Record>(&self, statement: &Statement) -> Result<Vec<R>> {
        self.echo(statement);
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&statement.sql)?;
        let rows = stmt.query(params_from_iter(statement.params.iter().map(Param)))?;
        Ok(rows_to_records(rows)?)
    }
}
