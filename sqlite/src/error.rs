//! Error types for mapper operations.
//!
//! Every failure is fatal to the call in progress. Nothing is retried or
//! rolled back by the mapper.

use thiserror::Error;

/// Errors that can occur while mapping records onto SQLite tables.
#[derive(Debug, Error)]
pub enum OrmError {
    /// The record type cannot be mapped (e.g. it has no `id` field).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The record's current values cannot drive the requested statement.
    #[error("mapping error: {0}")]
    Mapping(String),

    /// The store rejected a statement or a column value could not be
    /// decoded into its field.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Configuration file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`OrmError`].
pub type Result<T> = std::result::Result<T, OrmError>;
