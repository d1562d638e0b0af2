//! Field and type name mapping.
//!
//! Every identifier that reaches SQL passes through this module: record type
//! names become table names and field names become column names, both in
//! upper snake case. Declared field types map onto the column-type keyword
//! used in `CREATE TABLE` statements.

use crate::types::FieldType;

/// Column name of the store-assigned primary key.
pub const PRIMARY_KEY_COLUMN: &str = "ID";

/// Converts a field or type identifier into an upper snake case column name.
///
/// The first character is kept as is. Every later upper-case character that
/// starts a new word gets a `_` in front of it; an upper-case character that
/// directly follows another upper-case character or an existing `_` does
/// not. The result is upper-cased.
///
/// # Examples
///
/// ```
/// use lite_orm_core::to_column_name;
///
/// assert_eq!(to_column_name("hireDate"), "HIRE_DATE");
/// assert_eq!(to_column_name("id"), "ID");
/// assert_eq!(to_column_name("ABC"), "ABC");
/// assert_eq!(to_column_name("Employee"), "EMPLOYEE");
/// assert_eq!(to_column_name("hire_date"), "HIRE_DATE");
/// ```
pub fn to_column_name(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    let mut prev: Option<char> = None;

    for c in identifier.chars() {
        if let Some(p) = prev {
            if c.is_uppercase() && !p.is_uppercase() && p != '_' {
                out.push('_');
            }
        }
        out.push(c);
        prev = Some(c);
    }

    out.to_uppercase()
}

/// Returns the column-type keyword for a declared field type.
///
/// Total over [`FieldType`]: anything without a dedicated keyword is stored
/// as `BLOB`.
pub fn to_sql_type(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "VARCHAR",
        FieldType::Decimal => "NUMERIC",
        FieldType::Bool => "BIT",
        FieldType::I8 => "TINYINT",
        FieldType::I16 => "SMALLINT",
        FieldType::I32 => "INTEGER",
        FieldType::I64 => "BIGINT",
        FieldType::F32 => "REAL",
        FieldType::F64 => "DOUBLE",
        FieldType::Bytes => "BINARY",
        // Instants are stored as epoch milliseconds.
        FieldType::DateTime => "INTEGER",
        FieldType::Date => "DATE",
        FieldType::Time => "TIME",
        FieldType::Timestamp => "TIMESTAMP",
        FieldType::Other(_) => "BLOB",
    }
}

/// Returns `true` when `field_name` maps onto the primary key column.
pub fn is_primary_key(field_name: &str) -> bool {
    to_column_name(field_name).eq_ignore_ascii_case(PRIMARY_KEY_COLUMN)
}
