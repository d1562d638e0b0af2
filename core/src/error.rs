//! Error types for field assignment and value decoding.

use thiserror::Error;

use crate::types::FieldType;

/// A record field refused a value.
///
/// Returned by [`Record::set`](crate::Record::set). A shape mismatch is not
/// necessarily fatal: the codec treats it as the trigger for its decode
/// fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignError {
    /// The value's shape does not fit the field's declared type.
    #[error("expected {expected:?} value, found {found}")]
    TypeMismatch {
        /// Declared type of the field.
        expected: FieldType,
        /// Kind of the rejected value.
        found: &'static str,
    },

    /// The value fits the type but not its range.
    #[error("value {value} is out of range for {expected:?}")]
    OutOfRange {
        /// Declared type of the field.
        expected: FieldType,
        /// Rendered rejected value.
        value: String,
    },

    /// The record has no field with this name.
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// A column value could not be assigned to a field by any decode strategy.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot decode {found} into field '{field}': {source}")]
pub struct DecodeError {
    /// Field that rejected the value.
    pub field: &'static str,
    /// Kind of the column value.
    pub found: &'static str,
    /// Rejection reported by the last strategy tried.
    #[source]
    pub source: AssignError,
}

/// Convenience alias for field assignment results.
pub type Result<T> = std::result::Result<T, AssignError>;
