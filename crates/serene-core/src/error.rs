//! Core error types for serene-core.
//!
//! Validation failures, storage failures and export failures are kept in
//! separate enums so callers can surface each class of error differently.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for serene-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input rejected before any mutation or persistence write
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Persistence failure, reported upward without rollback
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Export/import container failure
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Validation errors.
///
/// Every variant here is checked before in-memory state changes and before
/// any persistence write; nothing is silently coerced.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Limit name needs at least one non-whitespace character
    #[error("Limit name needs to have a value")]
    EmptyName,

    /// Units label needs at least one non-whitespace character
    #[error("Limit units need to have a value")]
    EmptyUnitsName,

    /// Quota must be strictly positive
    #[error("Limit quota must be greater than zero, got {0}")]
    NonPositiveQuota(rust_decimal::Decimal),

    /// Another limit already uses this name (case-insensitive)
    #[error("{0} already exists, please pick another name")]
    DuplicateName(String),

    /// Logged amounts must be non-zero
    #[error("Amount must not be zero")]
    ZeroAmount,

    /// Clean dates cannot lie in the future
    #[error("Unable to set future clean dates")]
    FutureCleanDate,

    /// No limit with this name exists in the collection
    #[error("No limit named '{0}'")]
    UnknownLimit(String),

    /// Invalid value for a named field
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored tag column holds a value outside the closed enumeration.
    /// This is a hard failure, never a silent fallback.
    #[error("Unrecognized {field} tag '{value}' in stored record")]
    UnknownTag { field: &'static str, value: String },

    /// A stored scalar column failed to parse
    #[error("Invalid {field} in stored record: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// The day-ledger document for a limit failed to decode
    #[error("Corrupt day ledger document: {0}")]
    CorruptLedgers(String),

    /// Failed to access data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}

/// Export container errors.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Password does not meet the minimum length
    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// Sealing the container failed
    #[error("Failed to encrypt container")]
    EncryptFailed,

    /// Opening the container failed: wrong password or tampered data
    #[error("There was a problem decrypting the file, make sure the password is correct")]
    DecryptFailed,

    /// Container is shorter than a nonce plus authentication tag
    #[error("Container is too short to be valid")]
    Truncated,

    /// Failed to read/write the container file
    #[error("Failed to read or write container file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode or decode the contained limits
    #[error("Failed to encode or decode limits: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
