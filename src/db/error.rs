//! Error taxonomy for the data-access layer.
//!
//! Every failure that can escape a [`Db`](crate::db::db::Db) call is one of
//! the [`DbError`] variants below. Local input problems are reported as
//! [`ValidationError`] before the store is ever touched.

use rusqlite::ErrorCode;
use thiserror::Error;

/// A locally checked input rule that failed.
///
/// Raised before any statement is issued and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be between {min} and {max} characters")]
    Length { field: &'static str, min: usize, max: usize },

    #[error("{field} may only contain letters, spaces, hyphens, dots and commas")]
    Characters { field: &'static str },

    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    #[error("year must be between {min} and {max}")]
    YearRange { min: i32, max: i32 },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    DateFormat { value: String },

    #[error("date must be between 1900-01-01 and 2100-12-31")]
    DateRange,

    #[error("invalid date and time '{value}', expected YYYY-MM-DD HH:MM:SS")]
    DateTimeFormat { value: String },

    #[error("date and time must be between 1900-01-01 00:00:00 and 2100-12-31 23:59:59")]
    DateTimeRange,

    #[error("capacity must be between {min} and {max}")]
    Capacity { min: i64, max: i64 },

    #[error("{field} is required")]
    Required { field: &'static str },
}

/// Failures surfaced by the data-access layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// A logical entity name that is not in the table registry.
    #[error("unknown table configuration: {0}")]
    UnknownEntity(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store rejected a write because of a foreign key, unique or
    /// NOT NULL constraint.
    #[error("cannot delete or modify the record, it is referenced elsewhere ({0})")]
    Integrity(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{operation} was rolled back: {source}")]
    RolledBack {
        operation: &'static str,
        #[source]
        source: Box<DbError>,
    },

    #[error("database connection is not initialised")]
    NotInitialized,

    #[error("cannot prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Store(rusqlite::Error),
}

impl DbError {
    /// Connection drops and lock waits are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            DbError::Store(rusqlite::Error::SqliteFailure(err, _)) => {
                matches!(err.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
            }
            _ => false,
        }
    }

    /// True for integrity violations, including ones wrapped by a rollback.
    pub fn is_integrity(&self) -> bool {
        match self {
            DbError::Integrity(_) => true,
            DbError::RolledBack { source, .. } => source.is_integrity(),
            _ => false,
        }
    }

    /// The innermost error of a rolled back transaction, or `self`.
    pub fn root(&self) -> &DbError {
        match self {
            DbError::RolledBack { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, message) if failure.code == ErrorCode::ConstraintViolation => {
                DbError::Integrity(message.clone().unwrap_or_else(|| failure.to_string()))
            }
            _ => DbError::Store(err),
        }
    }
}

pub type DbResult<T> = std::result::Result<T, DbError>;
