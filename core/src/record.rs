//! The [`Record`] trait, field maps and the [`record!`](crate::record) macro.
//!
//! A record type is a plain struct plus a `'static` descriptor list. The
//! descriptors replace runtime introspection: they are written once, in
//! declaration order, and never rediscovered per call.

use crate::error::AssignError;
use crate::naming::{PRIMARY_KEY_COLUMN, to_column_name};
use crate::types::FieldDescriptor;
use crate::value::Value;

/// A struct that maps one-to-one onto a table row.
///
/// Implement it with the [`record!`](crate::record) macro, or by hand when a
/// field needs custom handling. The `Default` bound is the no-argument
/// constructor used to build records from result rows; fields without a
/// matching column keep their default.
pub trait Record: Default + 'static {
    /// Simple type name; the table name is derived from it.
    const TYPE_NAME: &'static str;

    /// Field descriptors in declaration order.
    fn fields() -> &'static [FieldDescriptor];

    /// Reads a field by its declared name.
    fn get(&self, field: &str) -> Option<Value>;

    /// Assigns a field by its declared name, rejecting foreign value shapes.
    fn set(&mut self, field: &str, value: Value) -> Result<(), AssignError>;

    /// Table name for this record type.
    fn table_name() -> String {
        to_column_name(Self::TYPE_NAME)
    }

    /// Descriptor of the primary key field, if the type declares one.
    fn primary_key_field() -> Option<&'static FieldDescriptor> {
        Self::fields().iter().find(|f| f.is_primary_key())
    }

    /// Projects the record's current values into a fresh [`FieldMap`].
    fn field_map(&self) -> FieldMap {
        let mut map = FieldMap::with_capacity(Self::fields().len());
        for field in Self::fields() {
            let value = self.get(field.name).unwrap_or(Value::Null);
            map.push(field.column_name(), value);
        }
        map
    }
}

/// Ordered column name → value projection of a record.
///
/// Built fresh for every operation; entries follow field declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, Value)>,
}

impl FieldMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with room for `capacity` columns.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends a column. Column order is insertion order.
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.entries.push((column.into(), value));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value.into());
        self
    }

    /// Looks up a column, ignoring ASCII case.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    /// Returns `true` if the primary key column is present.
    pub fn has_primary_key(&self) -> bool {
        self.get(PRIMARY_KEY_COLUMN).is_some()
    }

    /// Bound primary key value; `None` when the column is missing or null.
    pub fn primary_key(&self) -> Option<&Value> {
        self.get(PRIMARY_KEY_COLUMN).filter(|v| !v.is_null())
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Declares a struct and implements [`Record`] for it.
///
/// Every field type must implement [`FieldValue`](crate::FieldValue), and
/// the struct must implement `Default` (derive it). Attributes on the struct
/// and on fields are passed through.
///
/// # Examples
///
/// ```
/// use lite_orm_core::{Record, Value, record};
///
/// record! {
///     #[derive(Debug, Default, Clone, PartialEq)]
///     pub struct Employee {
///         pub id: i64,
///         pub first_name: Option<String>,
///         pub last_name: Option<String>,
///     }
/// }
///
/// assert_eq!(Employee::table_name(), "EMPLOYEE");
/// assert_eq!(Employee::fields().len(), 3);
///
/// let mut e = Employee::default();
/// e.set("first_name", Value::Text("John".into())).unwrap();
/// assert_eq!(e.first_name.as_deref(), Some("John"));
/// assert!(e.set("first_name", Value::Integer(3)).is_err());
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn fields() -> &'static [$crate::FieldDescriptor] {
                const FIELDS: &[$crate::FieldDescriptor] = &[
                    $(
                        $crate::FieldDescriptor::new(
                            stringify!($field),
                            <$ty as $crate::FieldValue>::FIELD_TYPE,
                            <$ty as $crate::FieldValue>::NULLABLE,
                        ),
                    )*
                ];
                FIELDS
            }

            fn get(&self, field: &str) -> ::std::option::Option<$crate::Value> {
                match field {
                    $(
                        stringify!($field) => ::std::option::Option::Some(
                            $crate::FieldValue::to_value(&self.$field),
                        ),
                    )*
                    _ => ::std::option::Option::None,
                }
            }

            fn set(
                &mut self,
                field: &str,
                value: $crate::Value,
            ) -> ::std::result::Result<(), $crate::AssignError> {
                match field {
                    $(
                        stringify!($field) => {
                            self.$field = <$ty as $crate::FieldValue>::from_value(value)?;
                            ::std::result::Result::Ok(())
                        }
                    )*
                    _ => ::std::result::Result::Err($crate::AssignError::UnknownField(
                        field.to_string(),
                    )),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;
    use chrono::{DateTime, Utc};

    crate::record! {
        #[derive(Debug, Default, Clone, PartialEq)]
        struct Employee {
            id: i64,
            first_name: Option<String>,
            last_name: Option<String>,
            hire_date: Option<DateTime<Utc>>,
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct AuditNote {
            body: String,
        }
    }

    #[test]
    fn test_descriptors_follow_declaration_order() {
        let names: Vec<_> = Employee::fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["id", "first_name", "last_name", "hire_date"]);

        let hire = &Employee::fields()[3];
        assert_eq!(hire.field_type, FieldType::DateTime);
        assert!(hire.nullable);
        assert!(!Employee::fields()[0].nullable);
    }

    #[test]
    fn test_table_name_and_primary_key() {
        assert_eq!(Employee::table_name(), "EMPLOYEE");
        assert_eq!(Employee::primary_key_field().unwrap().name, "id");
        assert_eq!(AuditNote::table_name(), "AUDIT_NOTE");
        assert!(AuditNote::primary_key_field().is_none());
    }

    #[test]
    fn test_field_map_projection() {
        let e = Employee {
            id: 4,
            first_name: Some("Jane".into()),
            last_name: None,
            hire_date: None,
        };
        let map = e.field_map();
        let columns: Vec<_> = map.columns().collect();
        assert_eq!(columns, vec!["ID", "FIRST_NAME", "LAST_NAME", "HIRE_DATE"]);
        assert_eq!(map.get("first_name"), Some(&Value::Text("Jane".into())));
        assert_eq!(map.get("LAST_NAME"), Some(&Value::Null));
        assert_eq!(map.primary_key(), Some(&Value::Integer(4)));
    }

    #[test]
    fn test_null_primary_key_is_unbound() {
        let map = FieldMap::new().with("ID", Value::Null).with("NAME", "x");
        assert!(map.has_primary_key());
        assert!(map.primary_key().is_none());
    }

    #[test]
    fn test_set_unknown_field() {
        let mut e = Employee::default();
        assert_eq!(
            e.set("salary", Value::Integer(1)),
            Err(AssignError::UnknownField("salary".into()))
        );
        assert!(e.get("salary").is_none());
    }
}
