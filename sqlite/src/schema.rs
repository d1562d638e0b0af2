//! Table schema generation for record types.
//!
//! Every record type gets one table, named after the upper snake cased type
//! name. The table always starts with a store-assigned primary key:
//!
//! ```text
//! CREATE TABLE IF NOT EXISTS "EMPLOYEE"(
//! "ID" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
//! "FIRST_NAME" VARCHAR NULL,
//! "LAST_NAME" VARCHAR NULL,
//! "HIRE_DATE" INTEGER NULL
//! )
//! ```
//!
//! Names are double-quoted, so record types and fields named after SQL
//! keywords map like any other.
//!
//! All checks run before any SQL is produced, so a record type that cannot
//! be mapped never reaches the store.

use std::collections::HashSet;

use lite_orm_core::{FieldDescriptor, FieldType, PRIMARY_KEY_COLUMN, Record, to_column_name};

use crate::error::{OrmError, Result};
use crate::statement::quote_identifier;

/// Definition of the injected primary key column.
const PRIMARY_KEY_DEFINITION: &str = "\"ID\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT";

/// Validates that an identifier contains only alphanumeric characters and
/// underscores.
pub(crate) fn validate_identifier(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(OrmError::Configuration(format!("{kind} name must not be empty")));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(OrmError::Configuration(format!(
            "invalid {kind} name '{name}': must contain only alphanumeric characters and underscores"
        )));
    }
    Ok(())
}

/// Returns the validated table name for a record type.
///
/// # Errors
///
/// Returns [`OrmError::Configuration`] if the type name is empty or maps to
/// an invalid identifier.
pub fn table_name<R: Record>() -> Result<String> {
    validate_identifier("record type", R::TYPE_NAME)?;
    let table = R::table_name();
    validate_identifier("table", &table)?;
    Ok(table)
}

/// Generates the `CREATE TABLE IF NOT EXISTS` statement for a record type.
///
/// # Errors
///
/// See [`create_table_sql_for`].
pub fn create_table_sql<R: Record>() -> Result<String> {
    create_table_sql_for(R::TYPE_NAME, R::fields())
}

/// Generates the `CREATE TABLE IF NOT EXISTS` statement for a named field set.
///
/// The `ID` column is injected first; the record's own id field is not
/// repeated. Every other field becomes a nullable column typed by
/// [`to_sql_type`](lite_orm_core::to_sql_type).
///
/// # Errors
///
/// Returns [`OrmError::Configuration`] if:
/// - the type name or a field name is not a valid identifier,
/// - no field maps onto the `ID` column,
/// - the id field is not an integer type,
/// - two fields map onto the same column.
///
/// # Examples
///
/// ```
/// use lite_orm_core::{FieldDescriptor, FieldType};
/// use lite_orm_sqlite::create_table_sql_for;
///
/// let fields = [
///     FieldDescriptor::new("id", FieldType::I64, false),
///     FieldDescriptor::new("firstName", FieldType::Text, true),
/// ];
/// let sql = create_table_sql_for("Employee", &fields).unwrap();
/// assert!(sql.starts_with(r#"CREATE TABLE IF NOT EXISTS "EMPLOYEE"("#));
/// assert!(sql.contains(r#""FIRST_NAME" VARCHAR NULL"#));
///
/// let no_id = [FieldDescriptor::new("name", FieldType::Text, true)];
/// assert!(create_table_sql_for("Tag", &no_id).is_err());
/// ```
pub fn create_table_sql_for(type_name: &str, fields: &[FieldDescriptor]) -> Result<String> {
    validate_identifier("record type", type_name)?;
    let table = to_column_name(type_name);

    let mut definitions = vec![PRIMARY_KEY_DEFINITION.to_string()];
    let mut seen = HashSet::with_capacity(fields.len());
    let mut has_primary_key = false;

    for field in fields {
        validate_identifier("field", field.name)?;
        let column = field.column_name();

        if !seen.insert(column.clone()) {
            return Err(OrmError::Configuration(format!(
                "record type '{type_name}' maps more than one field onto column {column}"
            )));
        }

        if column.eq_ignore_ascii_case(PRIMARY_KEY_COLUMN) {
            if !matches!(
                field.field_type,
                FieldType::I8 | FieldType::I16 | FieldType::I32 | FieldType::I64
            ) {
                return Err(OrmError::Configuration(format!(
                    "id field of record type '{type_name}' must be an integer, found {:?}",
                    field.field_type
                )));
            }
            has_primary_key = true;
            continue;
        }

        definitions.push(format!(
            "{} {} NULL",
            quote_identifier(&column),
            field.sql_type()
        ));
    }

    if !has_primary_key {
        return Err(OrmError::Configuration(format!(
            "record type '{type_name}' must contain an id field"
        )));
    }

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {}(\n{}\n)",
        quote_identifier(&table),
        definitions.join(",\n")
    ))
}
