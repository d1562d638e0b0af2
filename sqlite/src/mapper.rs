//! High-level record persistence.
//!
//! [`RecordMapper`] ties the pieces together: it projects a record into a
//! field map, makes sure the record type's table exists, generates the
//! statement and hands it to the store, then rebuilds records from the rows
//! that come back.
//!
//! # Example
//!
//! ```no_run
//! use chrono::{DateTime, Utc};
//! use lite_orm_core::record;
//! use lite_orm_sqlite::{RecordMapper, StoreConfig};
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     pub struct Employee {
//!         pub id: i64,
//!         pub first_name: Option<String>,
//!         pub last_name: Option<String>,
//!         pub hire_date: Option<DateTime<Utc>>,
//!     }
//! }
//!
//! let mapper = RecordMapper::new(StoreConfig::new("employees.db"));
//! let id = mapper
//!     .create(&Employee {
//!         first_name: Some("John".into()),
//!         last_name: Some("Smith".into()),
//!         hire_date: Some(Utc::now()),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! let mut john: Employee = mapper.find_by_id(id).unwrap().unwrap();
//! john.last_name = Some("Smythe".into());
//! mapper.update(&john).unwrap();
//!
//! let everyone: Vec<Employee> = mapper.find_all().unwrap();
//! println!("{} employees", everyone.len());
//! ```

use std::path::PathBuf;

use lite_orm_core::{Record, Value};
use rusqlite::{Connection, Rows, params_from_iter};
use tracing::debug;

use crate::config::StoreConfig;
use crate::convert::{Param, rows_to_records};
use crate::error::Result;
use crate::registry::SchemaRegistry;
use crate::schema::{create_table_sql, table_name};
use crate::statement::{self, Statement};
use crate::store::SqliteStore;

/// Persists [`Record`] types in one SQLite database file.
///
/// Every operation makes sure the record type's table exists before it
/// runs. The check is cached per record type in the mapper's
/// [`SchemaRegistry`], so independent mappers never share state. A mapper
/// can be shared between threads; each call uses its own connection.
///
/// Writers on the same file contend for SQLite's database lock. A connection
/// waits up to rusqlite's default busy timeout (five seconds) for the lock;
/// past that the call fails with a [`Store`](crate::OrmError::Store) error
/// carrying [`ErrorCode::DatabaseBusy`](rusqlite::ErrorCode::DatabaseBusy).
/// Nothing is retried on the caller's behalf.
#[derive(Debug, Default)]
pub struct RecordMapper {
    store: SqliteStore,
    registry: SchemaRegistry,
}

impl RecordMapper {
    /// Creates a mapper from a configuration.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            store: SqliteStore::new(config),
            registry: SchemaRegistry::new(),
        }
    }

    /// Creates a mapper for a database file with default settings.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::new(path))
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Returns the schema registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Opens a new connection to the database file, for statements the
    /// mapper does not generate.
    ///
    /// # Errors
    ///
    /// Returns [`Store`](crate::OrmError::Store) if the file cannot be opened.
    pub fn connect(&self) -> Result<Connection> {
        self.store.connect()
    }

    /// Creates the table for `R` unless this mapper already did.
    ///
    /// # Errors
    ///
    /// Returns [`Configuration`](crate::OrmError::Configuration) if `R`
    /// cannot be mapped. This is detected before the store is touched.
    /// Returns [`Store`](crate::OrmError::Store) if the store rejects the
    /// statement.
    pub fn ensure_table<R: Record>(&self) -> Result<()> {
        if self.registry.is_ensured::<R>() {
            debug!(record = R::TYPE_NAME, "Table already ensured");
            return Ok(());
        }

        let sql = create_table_sql::<R>()?;
        self.store.execute(&Statement::new(sql))?;
        if self.registry.mark_ensured::<R>() {
            let table = R::table_name();
            debug!(record = R::TYPE_NAME, table = %table, "Ensured table");
        }
        Ok(())
    }

    fn prepare<R: Record>(&self) -> Result<String> {
        self.ensure_table::<R>()?;
        table_name::<R>()
    }

    /// Inserts `record` as a new row and returns the id the store assigned.
    ///
    /// The record's own id value is ignored, as are null fields.
    ///
    /// # Errors
    ///
    /// Returns [`Mapping`](crate::OrmError::Mapping) if every non-key field
    /// is null.
    pub fn create<R: Record>(&self, record: &R) -> Result<i64> {
        let table = self.prepare::<R>()?;
        let stmt = statement::insert(&table, &record.field_map())?;
        let id = self.store.insert(&stmt)?;
        debug!(record = R::TYPE_NAME, id, "Created row");
        Ok(id)
    }

    /// Writes every field of `record` to the row with its id and returns the
    /// number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns [`Mapping`](crate::OrmError::Mapping) if the record has no
    /// bound id.
    pub fn update<R: Record>(&self, record: &R) -> Result<usize> {
        let table = self.prepare::<R>()?;
        let stmt = statement::update(&table, &record.field_map())?;
        self.store.execute(&stmt)
    }

    /// Deletes the row with `record`'s id and returns the number of rows
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`Mapping`](crate::OrmError::Mapping) if the record has no
    /// bound id.
    pub fn delete<R: Record>(&self, record: &R) -> Result<usize> {
        let table = self.prepare::<R>()?;
        let stmt = statement::delete(&table, &record.field_map())?;
        self.store.execute(&stmt)
    }

    /// Loads the record with the given id, or `None` if there is no such row.
    pub fn find_by_id<R: Record>(&self, id: i64) -> Result<Option<R>> {
        let table = self.prepare::<R>()?;
        let stmt = statement::select_by_id(&table, &R::default().field_map(), id);
        Ok(self.store.query::<R>(&stmt)?.into_iter().next())
    }

    /// Loads every record of type `R`, in id order.
    pub fn find_all<R: Record>(&self) -> Result<Vec<R>> {
        let table = self.prepare::<R>()?;
        self.store.query(&statement::select_all(&table))
    }

    /// Runs caller-supplied SQL and maps the result rows onto `R` by column
    /// name.
    ///
    /// Columns without a matching field are ignored; fields without a
    /// matching column keep their default value.
    pub fn query<R: Record>(&self, sql: &str) -> Result<Vec<R>> {
        self.query_with(sql, &[])
    }

    /// Like [`query`](Self::query), binding `params` to the numbered
    /// placeholders in `sql`.
    pub fn query_with<R: Record>(&self, sql: &str, params: &[Value]) -> Result<Vec<R>> {
        self.ensure_table::<R>()?;
        self.store.query(&Statement::with_params(sql, params))
    }

    /// Runs a statement the caller prepared, typically on a connection from
    /// [`connect`](Self::connect), and maps its rows onto `R`.
    pub fn query_statement<R: Record>(
        &self,
        stmt: &mut rusqlite::Statement<'_>,
        params: &[Value],
    ) -> Result<Vec<R>> {
        self.ensure_table::<R>()?;
        debug!(
            record = R::TYPE_NAME,
            columns = stmt.column_count(),
            params = params.len(),
            "Running caller-prepared statement"
        );
        let rows = stmt.query(params_from_iter(params.iter().map(Param)))?;
        Ok(rows_to_records(rows)?)
    }

    /// Maps rows the caller already obtained onto `R`.
    pub fn map_rows<R: Record>(&self, rows: Rows<'_>) -> Result<Vec<R>> {
        Ok(rows_to_records(rows)?)
    }
}
