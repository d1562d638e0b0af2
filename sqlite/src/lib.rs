//! SQLite persistence for [`Record`](lite_orm_core::Record) types.
//!
//! Each record type maps onto one table named after the type, with one
//! column per field and a store-assigned `ID` primary key. Tables are
//! created on first use and never altered.
//!
//! # Architecture
//!
//! - **`schema`**: `CREATE TABLE IF NOT EXISTS` generation and record type
//!   validation
//! - **`statement`**: parameterized CRUD statements built from field maps
//! - **`convert`**: value binding and row to record mapping
//! - **`store`**: statement execution, one connection per call
//! - **`registry`**: which record types already have their table
//! - **`mapper`**: the [`RecordMapper`] API tying it all together
//!
//! # Quick start
//!
//! ```no_run
//! use lite_orm_core::record;
//! use lite_orm_sqlite::{RecordMapper, StoreConfig};
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     pub struct Task {
//!         pub id: i64,
//!         pub title: Option<String>,
//!         pub done: bool,
//!     }
//! }
//!
//! let mapper = RecordMapper::new(StoreConfig::new("tasks.db").with_echo_sql(true));
//! let id = mapper
//!     .create(&Task { title: Some("write docs".into()), ..Default::default() })
//!     .unwrap();
//!
//! if let Some(task) = mapper.find_by_id::<Task>(id).unwrap() {
//!     println!("{:?}", task);
//! }
//! ```
//!
//! # Raw queries
//!
//! [`RecordMapper::query`] maps the rows of any SQL onto a record type by
//! column name. [`RecordMapper::query_statement`] and
//! [`RecordMapper::map_rows`] do the same for statements and row sets the
//! caller prepared on a connection from [`RecordMapper::connect`].

mod config;
mod convert;
mod error;
mod mapper;
mod registry;
mod schema;
pub mod statement;
mod store;

pub use config::{DEFAULT_DATABASE_PATH, StoreConfig};
pub use convert::rows_to_records;
pub use error::{OrmError, Result};
pub use mapper::RecordMapper;
pub use registry::SchemaRegistry;
pub use schema::{create_table_sql, create_table_sql_for, table_name};
pub use statement::Statement;
pub use store::{SQL_TARGET, SqliteStore};

pub use rusqlite;
