//! Dynamic column values and typed field conversion.
//!
//! [`Value`] is the currency between records and the store: field maps hold
//! values, statements bind them and result rows produce them. The
//! [`FieldValue`] trait connects a Rust field type to its declared
//! [`FieldType`] and to the value shapes it accepts on assignment.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{AssignError, Result};
use crate::types::FieldType;

/// A single column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Signed 64-bit integer.
    Integer(i64),
    /// Double-precision float.
    Real(f64),
    /// Arbitrary-precision decimal.
    Decimal(Decimal),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
    /// Instant in time.
    DateTime(DateTime<Utc>),
}

impl Value {
    /// Short name of the value's shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
            Value::DateTime(_) => "datetime",
        }
    }

    /// Returns `true` for SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the integer payload, if any.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the value as a SQL literal, for diagnostics only.
///
/// Statements never interpolate this rendering; values are always bound.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Blob(bytes) => {
                f.write_str("X'")?;
                for b in bytes {
                    write!(f, "{b:02X}")?;
                }
                f.write_str("'")
            }
            Value::DateTime(dt) => write!(f, "{}", dt.timestamp_millis()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

/// A Rust type that can live in a record field.
///
/// `to_value` projects the field into a [`Value`]; `from_value` is the field
/// setter and rejects values whose shape does not fit. Rejection is how the
/// codec learns that a decode fallback is needed.
pub trait FieldValue: Sized {
    /// Declared type used for the column definition.
    const FIELD_TYPE: FieldType;
    /// Whether the field accepts null.
    const NULLABLE: bool = false;

    /// Projects the field into a value.
    fn to_value(&self) -> Value;

    /// Builds the field from a value, rejecting foreign shapes.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T>(expected: FieldType, value: &Value) -> Result<T> {
    Err(AssignError::TypeMismatch {
        expected,
        found: value.kind(),
    })
}

impl FieldValue for String {
    const FIELD_TYPE: FieldType = FieldType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => mismatch(Self::FIELD_TYPE, &other),
        }
    }
}

impl FieldValue for bool {
    const FIELD_TYPE: FieldType = FieldType::Bool;

    fn to_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(v) => Ok(v != 0),
            other => mismatch(Self::FIELD_TYPE, &other),
        }
    }
}

macro_rules! narrow_integer_field {
    ($($ty:ty => $field_type:expr),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const FIELD_TYPE: FieldType = $field_type;

                fn to_value(&self) -> Value {
                    Value::Integer(i64::from(*self))
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Integer(v) => <$ty>::try_from(v).map_err(|_| AssignError::OutOfRange {
                            expected: Self::FIELD_TYPE,
                            value: v.to_string(),
                        }),
                        other => mismatch(Self::FIELD_TYPE, &other),
                    }
                }
            }
        )*
    };
}

narrow_integer_field! {
    i8 => FieldType::I8,
    i16 => FieldType::I16,
    i32 => FieldType::I32,
}

impl FieldValue for i64 {
    const FIELD_TYPE: FieldType = FieldType::I64;

    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(v) => Ok(v),
            other => mismatch(Self::FIELD_TYPE, &other),
        }
    }
}

impl FieldValue for f64 {
    const FIELD_TYPE: FieldType = FieldType::F64;

    fn to_value(&self) -> Value {
        Value::Real(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Real(v) => Ok(v),
            // Widening, as REAL affinity may hand back whole numbers.
            Value::Integer(v) => Ok(v as f64),
            other => mismatch(Self::FIELD_TYPE, &other),
        }
    }
}

impl FieldValue for f32 {
    const FIELD_TYPE: FieldType = FieldType::F32;

    fn to_value(&self) -> Value {
        Value::Real(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Real(v) => Ok(v as f32),
            Value::Integer(v) => Ok(v as f32),
            other => mismatch(Self::FIELD_TYPE, &other),
        }
    }
}

impl FieldValue for Vec<u8> {
    const FIELD_TYPE: FieldType = FieldType::Bytes;

    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(bytes) => Ok(bytes),
            other => mismatch(Self::FIELD_TYPE, &other),
        }
    }
}

/// Decimals are written as their exact text, but a `NUMERIC` column may
/// store that text as a 64-bit float. Values with more than 15 significant
/// digits can therefore read back rounded.
impl FieldValue for Decimal {
    const FIELD_TYPE: FieldType = FieldType::Decimal;

    fn to_value(&self) -> Value {
        Value::Decimal(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        let parsed = match &value {
            Value::Decimal(d) => Some(*d),
            Value::Integer(v) => Some(Decimal::from(*v)),
            // Shortest round-trip rendering keeps `0.1` as `0.1`.
            Value::Real(v) => v.to_string().parse::<Decimal>().ok(),
            Value::Text(s) => s.trim().parse::<Decimal>().ok(),
            _ => return mismatch(Self::FIELD_TYPE, &value),
        };
        parsed.ok_or_else(|| AssignError::OutOfRange {
            expected: Self::FIELD_TYPE,
            value: value.to_string(),
        })
    }
}

impl FieldValue for DateTime<Utc> {
    const FIELD_TYPE: FieldType = FieldType::DateTime;

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            other => mismatch(Self::FIELD_TYPE, &other),
        }
    }
}

impl FieldValue for NaiveDate {
    const FIELD_TYPE: FieldType = FieldType::Date;

    fn to_value(&self) -> Value {
        Value::DateTime(self.and_time(NaiveTime::MIN).and_utc())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(dt) => Ok(dt.date_naive()),
            other => mismatch(Self::FIELD_TYPE, &other),
        }
    }
}

impl FieldValue for NaiveTime {
    const FIELD_TYPE: FieldType = FieldType::Time;

    fn to_value(&self) -> Value {
        // Milliseconds since midnight, anchored at the epoch.
        Value::DateTime(DateTime::<Utc>::UNIX_EPOCH.date_naive().and_time(*self).and_utc())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(dt) => Ok(dt.time()),
            other => mismatch(Self::FIELD_TYPE, &other),
        }
    }
}

impl FieldValue for NaiveDateTime {
    const FIELD_TYPE: FieldType = FieldType::Timestamp;

    fn to_value(&self) -> Value {
        Value::DateTime(self.and_utc())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(dt) => Ok(dt.naive_utc()),
            other => mismatch(Self::FIELD_TYPE, &other),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_renders_literals() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Text("O'Brien".into()).to_string(), "'O''Brien'");
        assert_eq!(Value::Blob(vec![0xde, 0xad]).to_string(), "X'DEAD'");
    }

    #[test]
    fn test_text_field_rejects_integer() {
        let err = String::from_value(Value::Integer(7)).unwrap_err();
        assert_eq!(
            err,
            AssignError::TypeMismatch {
                expected: FieldType::Text,
                found: "integer"
            }
        );
    }

    #[test]
    fn test_narrow_integer_out_of_range() {
        assert_eq!(i8::from_value(Value::Integer(12)).unwrap(), 12);
        assert!(matches!(
            i8::from_value(Value::Integer(300)),
            Err(AssignError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_float_widens_integer() {
        assert_eq!(f64::from_value(Value::Integer(3)).unwrap(), 3.0);
        assert_eq!(f32::from_value(Value::Real(1.5)).unwrap(), 1.5);
    }

    #[test]
    fn test_bool_from_integer() {
        assert!(bool::from_value(Value::Integer(1)).unwrap());
        assert!(!bool::from_value(Value::Integer(0)).unwrap());
        assert_eq!(true.to_value(), Value::Integer(1));
    }

    #[test]
    fn test_decimal_accepts_numeric_shapes() {
        let expected: Decimal = "12.50".parse().unwrap();
        assert_eq!(Decimal::from_value(Value::Real(12.5)).unwrap(), expected);
        assert_eq!(Decimal::from_value(Value::Text("12.50".into())).unwrap(), expected);
        assert_eq!(
            Decimal::from_value(Value::Real(0.1)).unwrap(),
            "0.1".parse::<Decimal>().unwrap()
        );
        assert!(Decimal::from_value(Value::Blob(vec![1])).is_err());
    }

    #[test]
    fn test_datetime_rejects_raw_integer() {
        assert!(DateTime::<Utc>::from_value(Value::Integer(1_700_000_000_000)).is_err());
    }

    #[test]
    fn test_naive_date_projects_to_midnight() {
        let date = NaiveDate::from_ymd_opt(2020, 5, 17).unwrap();
        let expected = Utc.with_ymd_and_hms(2020, 5, 17, 0, 0, 0).unwrap();
        assert_eq!(date.to_value(), Value::DateTime(expected));
        assert_eq!(NaiveDate::from_value(Value::DateTime(expected)).unwrap(), date);
    }

    #[test]
    fn test_naive_time_anchors_at_epoch() {
        let time = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        let Value::DateTime(dt) = time.to_value() else {
            panic!("expected datetime");
        };
        assert_eq!(dt.timestamp_millis(), (8 * 3600 + 30 * 60) * 1000);
        assert_eq!(NaiveTime::from_value(Value::DateTime(dt)).unwrap(), time);
    }

    #[test]
    fn test_option_maps_null() {
        assert_eq!(Option::<String>::from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::from_value(Value::Text("x".into())).unwrap(),
            Some("x".to_string())
        );
        assert_eq!(None::<i64>.to_value(), Value::Null);
        assert!(<Option<i64> as FieldValue>::NULLABLE);
        assert!(!<i64 as FieldValue>::NULLABLE);
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Null,
            Value::Integer(1),
            Value::Text("a".into()),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,1,"a"]"#);
    }
}
