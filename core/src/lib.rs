//! Record descriptors, name mapping and value coercion.
//!
//! This crate holds everything about the object-relational mapping that does
//! not need a database:
//!
//! - [`Record`]: a struct mapped one-to-one onto a table row, described by
//!   an ordered `'static` list of [`FieldDescriptor`]s. The [`record!`]
//!   macro writes the implementation.
//! - [`to_column_name`] / [`to_sql_type`]: identifier and type mapping.
//! - [`Value`] / [`FieldValue`]: dynamic column values and the typed field
//!   setters that accept or reject them.
//! - [`encode`] / [`decode_into`]: the value codec, including the
//!   epoch-millisecond decode fallback for date fields.
//!
//! # Example
//!
//! ```
//! use chrono::{DateTime, Utc};
//! use lite_orm_core::*;
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     pub struct Employee {
//!         pub id: i64,
//!         pub first_name: Option<String>,
//!         pub hire_date: Option<DateTime<Utc>>,
//!     }
//! }
//!
//! assert_eq!(Employee::table_name(), "EMPLOYEE");
//! let hire = &Employee::fields()[2];
//! assert_eq!(hire.column_name(), "HIRE_DATE");
//! assert_eq!(hire.sql_type(), "INTEGER");
//!
//! // A raw integer lands in the date field through the decode fallback.
//! let mut e = Employee::default();
//! let strategy = decode_into(&mut e, hire, Value::Integer(0)).unwrap();
//! assert_eq!(strategy, DecodeStrategy::EpochMillis);
//! assert_eq!(e.hire_date, Some(DateTime::<Utc>::UNIX_EPOCH));
//! ```

mod codec;
mod error;
mod naming;
mod record;
mod types;
mod value;

pub use codec::{
    DecodeStrategy, decode_into, encode, epoch_millis_to_datetime, field_for_column,
    resolve_columns,
};
pub use error::{AssignError, DecodeError};
pub use naming::{PRIMARY_KEY_COLUMN, is_primary_key, to_column_name, to_sql_type};
pub use record::{FieldMap, Record};
pub use types::{FieldDescriptor, FieldType};
pub use value::{FieldValue, Value};
