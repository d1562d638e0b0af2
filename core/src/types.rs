//! Declared field types and field descriptors.
//!
//! A record type describes itself with an ordered, `'static` list of
//! [`FieldDescriptor`]s. The list is built once (usually by the
//! [`record!`](crate::record) macro) and drives schema creation, statement
//! generation and row mapping.

use serde::Serialize;

use crate::naming::{is_primary_key, to_column_name, to_sql_type};

/// Declared type of a record field.
///
/// # Examples
///
/// ```
/// use lite_orm_core::{FieldType, to_sql_type};
///
/// assert_eq!(to_sql_type(&FieldType::Text), "VARCHAR");
/// assert_eq!(to_sql_type(&FieldType::Other("Point")), "BLOB");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldType {
    /// UTF-8 text.
    Text,
    /// Arbitrary-precision decimal number.
    Decimal,
    /// Boolean flag.
    Bool,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// Single-precision float.
    F32,
    /// Double-precision float.
    F64,
    /// Raw byte sequence.
    Bytes,
    /// Instant in time (UTC), stored as epoch milliseconds.
    DateTime,
    /// Calendar date without a time of day.
    Date,
    /// Time of day without a date.
    Time,
    /// Date and time without a time zone.
    Timestamp,
    /// Any other type, identified by name.
    Other(&'static str),
}

/// Describes one field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Field identifier as declared on the record.
    pub name: &'static str,
    /// Declared type of the field.
    pub field_type: FieldType,
    /// Whether the field accepts null.
    pub nullable: bool,
}

impl FieldDescriptor {
    /// Creates a descriptor. Usable in `const` context.
    pub const fn new(name: &'static str, field_type: FieldType, nullable: bool) -> Self {
        Self {
            name,
            field_type,
            nullable,
        }
    }

    /// Column name this field maps onto.
    pub fn column_name(&self) -> String {
        to_column_name(self.name)
    }

    /// Column-type keyword for this field.
    pub fn sql_type(&self) -> &'static str {
        to_sql_type(&self.field_type)
    }

    /// Returns `true` if this is the primary key field.
    pub fn is_primary_key(&self) -> bool {
        is_primary_key(self.name)
    }
}
