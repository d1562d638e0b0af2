//! Value coercion between record fields and store columns.
//!
//! # Encoding
//!
//! [`encode`] turns a field value into a store-native parameter. Instants
//! become epoch milliseconds, decimals become their exact text rendering and
//! everything else passes through. Null stays null; statement generation
//! decides whether a null column is bound or omitted.
//!
//! # Decoding
//!
//! [`decode_into`] assigns a column value to a record field. It first tries a
//! direct assignment. When the field setter rejects the value's shape, the
//! value is reinterpreted as epoch milliseconds and assigned as an instant.
//! This is what lets date fields round-trip through an engine that has no
//! native date column type. The fallback is driven by the rejection itself,
//! not by the field's declared type, so any field that accepts an instant
//! recovers the same way.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::DecodeError;
use crate::record::Record;
use crate::types::FieldDescriptor;
use crate::value::Value;

/// How a column value ended up in its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// The field accepted the value as is.
    Direct,
    /// The field rejected the value; it was reinterpreted as epoch
    /// milliseconds and assigned as an instant.
    EpochMillis,
}

/// Converts a field value into a store-native parameter.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use lite_orm_core::{Value, encode};
///
/// let hired = Utc.timestamp_millis_opt(1_589_673_600_000).unwrap();
/// assert_eq!(encode(&Value::DateTime(hired)), Value::Integer(1_589_673_600_000));
/// assert_eq!(encode(&Value::Text("x".into())), Value::Text("x".into()));
/// ```
pub fn encode(value: &Value) -> Value {
    match value {
        Value::DateTime(dt) => Value::Integer(dt.timestamp_millis()),
        Value::Decimal(d) => Value::Text(d.to_string()),
        other => other.clone(),
    }
}

/// Interprets `millis` as milliseconds since the Unix epoch.
pub fn epoch_millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Reads a value as epoch milliseconds, if its shape allows it.
fn reinterpret_epoch_millis(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Integer(ms) => epoch_millis_to_datetime(*ms),
        Value::Text(s) => s.trim().parse::<i64>().ok().and_then(epoch_millis_to_datetime),
        _ => None,
    }
}

/// Assigns `value` to `field` on `record`, falling back to epoch-millisecond
/// reinterpretation when direct assignment is rejected.
///
/// # Errors
///
/// Returns [`DecodeError`] when both strategies are rejected. The error
/// carries the rejection of the last strategy tried.
pub fn decode_into<R: Record>(
    record: &mut R,
    field: &FieldDescriptor,
    value: Value,
) -> Result<DecodeStrategy, DecodeError> {
    let found = value.kind();
    let fallback = reinterpret_epoch_millis(&value);

    let direct_err = match record.set(field.name, value) {
        Ok(()) => return Ok(DecodeStrategy::Direct),
        Err(e) => e,
    };

    let Some(instant) = fallback else {
        return Err(DecodeError {
            field: field.name,
            found,
            source: direct_err,
        });
    };

    debug!(
        record = R::TYPE_NAME,
        field = field.name,
        found,
        rejected = %direct_err,
        "Direct assignment rejected, reinterpreting as epoch millis"
    );

    record
        .set(field.name, Value::DateTime(instant))
        .map(|()| DecodeStrategy::EpochMillis)
        .map_err(|source| DecodeError {
            field: field.name,
            found,
            source,
        })
}

/// Finds the field of `R` that maps onto `column`, ignoring ASCII case.
pub fn field_for_column<R: Record>(column: &str) -> Option<&'static FieldDescriptor> {
    R::fields()
        .iter()
        .find(|f| f.column_name().eq_ignore_ascii_case(column))
}

/// Resolves every result column to a field of `R` once per result set.
///
/// Unmatched columns resolve to `None` and are skipped during mapping.
pub fn resolve_columns<R: Record, S: AsRef<str>>(
    columns: &[S],
) -> Vec<Option<&'static FieldDescriptor>> {
    columns
        .iter()
        .map(|c| field_for_column::<R>(c.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssignError;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;

    crate::record! {
        #[derive(Debug, Default, PartialEq)]
        struct Shift {
            id: i64,
            label: Option<String>,
            starts_at: Option<DateTime<Utc>>,
            day: Option<NaiveDate>,
            rate: Option<Decimal>,
        }
    }

    fn field(name: &str) -> &'static FieldDescriptor {
        Shift::fields().iter().find(|f| f.name == name).unwrap()
    }

    #[test]
    fn test_encode_passthrough_and_null() {
        assert_eq!(encode(&Value::Null), Value::Null);
        assert_eq!(encode(&Value::Integer(5)), Value::Integer(5));
        assert_eq!(encode(&Value::Real(2.5)), Value::Real(2.5));
        assert_eq!(encode(&Value::Blob(vec![1, 2])), Value::Blob(vec![1, 2]));
    }

    #[test]
    fn test_encode_decimal_as_exact_text() {
        let d: Decimal = "1234.5600".parse().unwrap();
        assert_eq!(encode(&Value::Decimal(d)), Value::Text("1234.5600".into()));
    }

    #[test]
    fn test_decode_direct() {
        let mut shift = Shift::default();
        let strategy = decode_into(&mut shift, field("label"), Value::Text("night".into())).unwrap();
        assert_eq!(strategy, DecodeStrategy::Direct);
        assert_eq!(shift.label.as_deref(), Some("night"));
    }

    #[test]
    fn test_decode_null_is_direct() {
        let mut shift = Shift {
            label: Some("x".into()),
            ..Default::default()
        };
        let strategy = decode_into(&mut shift, field("label"), Value::Null).unwrap();
        assert_eq!(strategy, DecodeStrategy::Direct);
        assert!(shift.label.is_none());
    }

    #[test]
    fn test_decode_integer_into_instant_uses_fallback() {
        let mut shift = Shift::default();
        let millis = 1_589_700_000_123;
        let strategy =
            decode_into(&mut shift, field("starts_at"), Value::Integer(millis)).unwrap();
        assert_eq!(strategy, DecodeStrategy::EpochMillis);
        assert_eq!(
            shift.starts_at,
            Some(Utc.timestamp_millis_opt(millis).unwrap())
        );
    }

    #[test]
    fn test_fallback_is_not_keyed_on_type_name() {
        // A calendar date field recovers through the same path.
        let mut shift = Shift::default();
        let midnight = Utc.with_ymd_and_hms(2021, 3, 9, 0, 0, 0).unwrap();
        let strategy = decode_into(
            &mut shift,
            field("day"),
            Value::Integer(midnight.timestamp_millis()),
        )
        .unwrap();
        assert_eq!(strategy, DecodeStrategy::EpochMillis);
        assert_eq!(shift.day, NaiveDate::from_ymd_opt(2021, 3, 9));
    }

    #[test]
    fn test_fallback_accepts_numeric_text() {
        let mut shift = Shift::default();
        let strategy =
            decode_into(&mut shift, field("starts_at"), Value::Text("86400000".into())).unwrap();
        assert_eq!(strategy, DecodeStrategy::EpochMillis);
        assert_eq!(
            shift.starts_at,
            Some(Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_failed_fallback_reports_last_rejection() {
        let mut shift = Shift::default();
        let err = decode_into(&mut shift, field("label"), Value::Integer(42)).unwrap_err();
        assert_eq!(err.field, "label");
        assert_eq!(err.found, "integer");
        assert_eq!(
            err.source,
            AssignError::TypeMismatch {
                expected: crate::types::FieldType::Text,
                found: "datetime"
            }
        );
    }

    #[test]
    fn test_unreinterpretable_value_reports_direct_rejection() {
        let mut shift = Shift::default();
        let err = decode_into(&mut shift, field("starts_at"), Value::Blob(vec![0])).unwrap_err();
        assert_eq!(err.found, "blob");
        assert!(matches!(err.source, AssignError::TypeMismatch { found: "blob", .. }));
    }

    #[test]
    fn test_resolve_columns_ignores_unknown() {
        let resolved = resolve_columns::<Shift, _>(&["ID", "label", "EXTRA", "STARTS_AT"]);
        let names: Vec<_> = resolved.iter().map(|f| f.map(|f| f.name)).collect();
        assert_eq!(
            names,
            vec![Some("id"), Some("label"), None, Some("starts_at")]
        );
    }
}
