//! SQLite storage access: connection scoping, statement execution and schema
//! migration.
//!
//! # Responsibility
//! - Open and configure one SQLite connection per operation.
//! - Execute parameterized statements under a time budget.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Statement text is always a static template; values travel as bound
//!   parameters only.
//! - Store failures are classified, never collapsed into a generic error.
//! - Migration version is tracked via `PRAGMA user_version`.

use rusqlite::ErrorCode;
use thiserror::Error;

mod connector;
mod executor;
pub mod migrations;

pub use connector::{ScopedConnection, StoreConnector};
pub use executor::{QueryExecutor, RowSet, RowView, SqlValue, DATE_FORMAT};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure classes surfaced by the data-access core.
///
/// Every error type in the crate maps onto exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store unreachable, unusable or misconfigured.
    Connection,
    /// Missing or malformed input.
    Validation,
    /// Store rejected or could not decode a statement.
    Query,
    /// Update/delete matched no row.
    NotFound,
    /// Statement exceeded its time budget or lock wait.
    Timeout,
}

impl ErrorKind {
    /// Stable machine-readable code for logs and outcome envelopes.
    pub fn code(self) -> &'static str {
        match self {
            Self::Connection => "store_unavailable",
            Self::Validation => "validation_failed",
            Self::Query => "query_failed",
            Self::NotFound => "not_found",
            Self::Timeout => "timeout",
        }
    }
}

/// Errors raised while acquiring connections or running statements.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to open store `{path}`: {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("schema migration failed: {0}")]
    Migration(#[source] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    #[error("store schema is missing column `{column}` in table `{table}`")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("statement failed: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("cannot decode column `{column}`: expected {expected}, found {found}")]
    Decode {
        column: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("statement did not complete within {budget_ms}ms")]
    Timeout {
        budget_ms: u64,
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig(_)
            | Self::Connection { .. }
            | Self::Migration(_)
            | Self::UnsupportedSchemaVersion { .. }
            | Self::MissingRequiredColumn { .. } => ErrorKind::Connection,
            Self::Query(_) | Self::Decode { .. } => ErrorKind::Query,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Reclassifies a driver failure caused by the statement deadline or an
    /// exhausted lock wait as `Timeout`.
    pub(crate) fn classify_interrupt(self, budget_ms: u64) -> Self {
        match self {
            Self::Query(source) if is_interrupt(&source) => Self::Timeout { budget_ms, source },
            other => other,
        }
    }

    /// Reclassifies a migration that gave up waiting for the write lock as
    /// `Timeout`.
    pub(crate) fn classify_lock_wait(self, budget_ms: u64) -> Self {
        match self {
            Self::Migration(source) if is_interrupt(&source) => Self::Timeout { budget_ms, source },
            other => other,
        }
    }
}

fn is_interrupt(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.code,
                ErrorCode::OperationInterrupted | ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            )
    )
}
