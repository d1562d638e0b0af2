//! CRUD statement generation from field maps.
//!
//! Statements carry numbered placeholders (`?1`, `?2`, ...) and the encoded
//! values to bind, in placeholder order. Values are never interpolated into
//! the SQL text. Table and column names are double-quoted, so reserved words
//! such as `ORDER` or `GROUP` are usable as names.

use std::fmt;

use lite_orm_core::{FieldMap, PRIMARY_KEY_COLUMN, Value, encode};

use crate::error::{OrmError, Result};

/// SQL text plus the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text with numbered placeholders.
    pub sql: String,
    /// Encoded parameter values, in placeholder order.
    pub params: Vec<Value>,
}

impl Statement {
    /// Creates a statement without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a statement with parameters, encoding each one.
    pub fn with_params(sql: impl Into<String>, params: &[Value]) -> Self {
        Self {
            sql: sql.into(),
            params: params.iter().map(encode).collect(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)?;
        if !self.params.is_empty() {
            let rendered: Vec<String> = self.params.iter().map(ToString::to_string).collect();
            write!(f, " -- [{}]", rendered.join(", "))?;
        }
        Ok(())
    }
}

/// Double-quotes an SQL identifier, doubling any embedded quote.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quoted_list<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_primary_key_column(column: &str) -> bool {
    column.eq_ignore_ascii_case(PRIMARY_KEY_COLUMN)
}

fn require_primary_key<'a>(table: &str, fields: &'a FieldMap, action: &str) -> Result<&'a Value> {
    fields.primary_key().ok_or_else(|| {
        OrmError::Mapping(format!(
            "cannot {action} {table} row without a bound {PRIMARY_KEY_COLUMN} value"
        ))
    })
}

/// Builds an `INSERT` for the non-null, non-key columns.
///
/// The primary key is left to the store. Null columns are omitted so they
/// take the column default.
///
/// # Errors
///
/// Returns [`OrmError::Mapping`] if no column is left to insert.
///
/// # Examples
///
/// ```
/// use lite_orm_core::{FieldMap, Value};
/// use lite_orm_sqlite::statement;
///
/// let fields = FieldMap::new()
///     .with("ID", 0i64)
///     .with("FIRST_NAME", "John")
///     .with("LAST_NAME", Value::Null);
/// let stmt = statement::insert("EMPLOYEE", &fields).unwrap();
/// assert_eq!(stmt.sql, r#"INSERT INTO "EMPLOYEE" ("FIRST_NAME") VALUES (?1)"#);
/// assert_eq!(stmt.params, vec![Value::Text("John".into())]);
/// ```
pub fn insert(table: &str, fields: &FieldMap) -> Result<Statement> {
    let (columns, params): (Vec<&str>, Vec<Value>) = fields
        .iter()
        .filter(|(column, value)| !is_primary_key_column(column) && !value.is_null())
        .map(|(column, value)| (column, encode(value)))
        .unzip();

    if columns.is_empty() {
        return Err(OrmError::Mapping(format!(
            "cannot insert into {table}: every non-key field is null"
        )));
    }

    Ok(Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(table),
            quoted_list(columns.iter().copied()),
            placeholders(columns.len())
        ),
        params,
    })
}

/// Builds an `UPDATE` of every column, targeted by the primary key.
///
/// All columns are bound in enumeration order, the key included; the key is
/// bound once more for the `WHERE` clause.
///
/// # Errors
///
/// Returns [`OrmError::Mapping`] if the primary key is missing or null.
pub fn update(table: &str, fields: &FieldMap) -> Result<Statement> {
    let id = encode(require_primary_key(table, fields, "update")?);

    let mut assignments = Vec::with_capacity(fields.len());
    let mut params = Vec::with_capacity(fields.len() + 1);
    for (i, (column, value)) in fields.iter().enumerate() {
        assignments.push(format!("{} = ?{}", quote_identifier(column), i + 1));
        params.push(encode(value));
    }
    params.push(id);

    Ok(Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            quote_identifier(table),
            assignments.join(", "),
            quote_identifier(PRIMARY_KEY_COLUMN),
            params.len()
        ),
        params,
    })
}

/// Builds a `DELETE` targeted by the primary key.
///
/// # Errors
///
/// Returns [`OrmError::Mapping`] if the primary key is missing or null.
pub fn delete(table: &str, fields: &FieldMap) -> Result<Statement> {
    let id = encode(require_primary_key(table, fields, "delete")?);
    Ok(Statement {
        sql: format!(
            "DELETE FROM {} WHERE {} = ?1",
            quote_identifier(table),
            quote_identifier(PRIMARY_KEY_COLUMN)
        ),
        params: vec![id],
    })
}

/// Builds a `SELECT` of exactly the declared columns for one primary key.
///
/// Naming the columns keeps the result shape identical to the field map.
pub fn select_by_id(table: &str, fields: &FieldMap, id: i64) -> Statement {
    Statement {
        sql: format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            quoted_list(fields.columns()),
            quote_identifier(table),
            quote_identifier(PRIMARY_KEY_COLUMN)
        ),
        params: vec![Value::Integer(id)],
    }
}

/// Builds a `SELECT *` over the whole table, in primary key order.
///
/// Rows are mapped by result column name rather than by a declared shape.
pub fn select_all(table: &str) -> Statement {
    Statement::new(format!(
        "SELECT * FROM {} ORDER BY {}",
        quote_identifier(table),
        quote_identifier(PRIMARY_KEY_COLUMN)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn employee(id: Value) -> FieldMap {
        FieldMap::new()
            .with("ID", id)
            .with("FIRST_NAME", "John")
            .with("LAST_NAME", "Smith")
            .with(
                "HIRE_DATE",
                Utc.timestamp_millis_opt(1_600_000_000_000).unwrap(),
            )
    }

    #[test]
    fn test_insert_drops_key_and_encodes_dates() {
        let stmt = insert("EMPLOYEE", &employee(Value::Integer(9))).unwrap();
        assert_eq!(
            stmt.sql,
            r#"INSERT INTO "EMPLOYEE" ("FIRST_NAME", "LAST_NAME", "HIRE_DATE") VALUES (?1, ?2, ?3)"#
        );
        assert_eq!(
            stmt.params,
            vec![
                Value::Text("John".into()),
                Value::Text("Smith".into()),
                Value::Integer(1_600_000_000_000),
            ]
        );
    }

    #[test]
    fn test_insert_omits_nulls() {
        let fields = FieldMap::new()
            .with("ID", Value::Null)
            .with("FIRST_NAME", Value::Null)
            .with("LAST_NAME", "Doe");
        let stmt = insert("EMPLOYEE", &fields).unwrap();
        assert_eq!(stmt.sql, r#"INSERT INTO "EMPLOYEE" ("LAST_NAME") VALUES (?1)"#);
    }

    #[test]
    fn test_insert_all_null_is_mapping_error() {
        let fields = FieldMap::new()
            .with("ID", 3i64)
            .with("FIRST_NAME", Value::Null);
        assert!(matches!(
            insert("EMPLOYEE", &fields),
            Err(OrmError::Mapping(_))
        ));
    }

    #[test]
    fn test_update_binds_every_column_then_key() {
        let stmt = update("EMPLOYEE", &employee(Value::Integer(7))).unwrap();
        assert_eq!(
            stmt.sql,
            r#"UPDATE "EMPLOYEE" SET "ID" = ?1, "FIRST_NAME" = ?2, "LAST_NAME" = ?3, "HIRE_DATE" = ?4 WHERE "ID" = ?5"#
        );
        assert_eq!(stmt.params.len(), 5);
        assert_eq!(stmt.params[0], Value::Integer(7));
        assert_eq!(stmt.params[3], Value::Integer(1_600_000_000_000));
        assert_eq!(stmt.params[4], Value::Integer(7));
    }

    #[test]
    fn test_update_without_key_is_mapping_error() {
        assert!(matches!(
            update("EMPLOYEE", &employee(Value::Null)),
            Err(OrmError::Mapping(_))
        ));
        let no_key = FieldMap::new().with("NAME", "x");
        assert!(matches!(update("TAG", &no_key), Err(OrmError::Mapping(_))));
    }

    #[test]
    fn test_delete_by_key() {
        let stmt = delete("EMPLOYEE", &employee(Value::Integer(2))).unwrap();
        assert_eq!(stmt.sql, r#"DELETE FROM "EMPLOYEE" WHERE "ID" = ?1"#);
        assert_eq!(stmt.params, vec![Value::Integer(2)]);
        assert!(matches!(
            delete("EMPLOYEE", &employee(Value::Null)),
            Err(OrmError::Mapping(_))
        ));
    }

    #[test]
    fn test_select_by_id_names_declared_columns() {
        let stmt = select_by_id("EMPLOYEE", &employee(Value::Null), 11);
        assert_eq!(
            stmt.sql,
            r#"SELECT "ID", "FIRST_NAME", "LAST_NAME", "HIRE_DATE" FROM "EMPLOYEE" WHERE "ID" = ?1"#
        );
        assert_eq!(stmt.params, vec![Value::Integer(11)]);
    }

    #[test]
    fn test_select_all() {
        assert_eq!(select_all("EMPLOYEE").sql, r#"SELECT * FROM "EMPLOYEE" ORDER BY "ID""#);
    }

    #[test]
    fn test_display_lists_params() {
        let stmt = delete("EMPLOYEE", &employee(Value::Integer(2))).unwrap();
        assert_eq!(stmt.to_string(), r#"DELETE FROM "EMPLOYEE" WHERE "ID" = ?1 -- [2]"#);
        assert_eq!(select_all("T").to_string(), r#"SELECT * FROM "T" ORDER BY "ID""#);
    }

    #[test]
    fn test_reserved_words_are_quoted() {
        let fields = FieldMap::new().with("ID", 1i64).with("GROUP", "north");
        let stmt = update("ORDER", &fields).unwrap();
        assert_eq!(
            stmt.sql,
            r#"UPDATE "ORDER" SET "ID" = ?1, "GROUP" = ?2 WHERE "ID" = ?3"#
        );
        assert_eq!(quote_identifier(r#"a"b"#), r#""a""b""#);
    }

    #[test]
    fn test_quotes_stay_in_parameters() {
        let fields = FieldMap::new().with("ID", Value::Null).with("LAST_NAME", "O'Brien");
        let stmt = insert("EMPLOYEE", &fields).unwrap();
        assert!(!stmt.sql.contains("O'Brien"));
        assert_eq!(stmt.params, vec![Value::Text("O'Brien".into())]);
    }
}
