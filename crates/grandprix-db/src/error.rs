//! # Database Error Types
//!
//! Error types for snapshot storage.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / MigrateError / serde_json::Error                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds the category and position involved       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller decides: start empty, retry, or report                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A category that was never saved is not an error. It loads as an empty list.

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// An entity could not be turned into a record payload.
    #[error("Failed to encode {category} record: {source}")]
    Encode {
        category: String,
        #[source]
        source: serde_json::Error,
    },

    /// A stored payload does not match the record shape.
    ///
    /// ## When This Occurs
    /// - The payload was edited by hand
    /// - A field was renamed without a schema version bump
    /// - A season membership window ends before it starts
    #[error("Failed to decode {category} record at position {position}: {source}")]
    Decode {
        category: String,
        position: i64,
        #[source]
        source: serde_json::Error,
    },

    /// Record written by a newer build than this one.
    #[error("{category} record at position {position} has schema version {found}, newest supported is {supported}")]
    UnsupportedSchema {
        category: String,
        position: i64,
        found: i64,
        supported: i64,
    },

    /// Loaded records break a directory or catalog rule (duplicate ids).
    #[error("Stored state is inconsistent: {0}")]
    InvalidSnapshot(#[from] grandprix_core::ValidationError),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
