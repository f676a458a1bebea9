//! Structured result envelope for CRUD callers.
//!
//! # Invariants
//! - `code` is stable and machine-readable; `message` is for humans only.
//! - `ok == true` exactly when `code` is a success code.

use crate::db::ErrorKind;
use crate::repo::RepoError;
use serde::Serialize;

/// Stable outcome code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeCode {
    Ok,
    Created,
    Updated,
    Deleted,
    NotFound,
    ValidationFailed,
    StoreUnavailable,
    QueryFailed,
    Timeout,
}

impl OutcomeCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::NotFound => "not_found",
            Self::ValidationFailed => "validation_failed",
            Self::StoreUnavailable => "store_unavailable",
            Self::QueryFailed => "query_failed",
            Self::Timeout => "timeout",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::Created | Self::Updated | Self::Deleted)
    }
}

impl From<ErrorKind> for OutcomeCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Connection => Self::StoreUnavailable,
            ErrorKind::Validation => Self::ValidationFailed,
            ErrorKind::Query => Self::QueryFailed,
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::Timeout => Self::Timeout,
        }
    }
}

/// Result of one CRUD operation as seen by an outer interface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub ok: bool,
    pub code: OutcomeCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    pub(crate) fn success(code: OutcomeCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            ok: true,
            code,
            message: message.into(),
            data,
        }
    }

    /// Builds a failure envelope; `action` is the verb used in the message.
    pub(crate) fn failure(action: &str, err: &RepoError) -> Self {
        Self {
            ok: false,
            code: err.kind().into(),
            message: format!("Failed to {action}: {err}"),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Outcome, OutcomeCode};
    use crate::db::ErrorKind;
    use crate::repo::{EntityKind, RepoError};

    #[test]
    fn error_kinds_map_to_failure_codes() {
        for kind in [
            ErrorKind::Connection,
            ErrorKind::Validation,
            ErrorKind::Query,
            ErrorKind::NotFound,
            ErrorKind::Timeout,
        ] {
            let code = OutcomeCode::from(kind);
            assert!(!code.is_success());
            assert_eq!(code.as_str(), kind.code());
        }
    }

    #[test]
    fn failure_carries_code_and_cause() {
        let err = RepoError::NotFound {
            entity: EntityKind::Employee,
            id: 42,
        };
        let outcome: Outcome<()> = Outcome::failure("delete", &err);
        assert!(!outcome.ok);
        assert_eq!(outcome.code, OutcomeCode::NotFound);
        assert_eq!(outcome.message, "Failed to delete: employee not found: 42");
        assert!(outcome.data.is_none());
    }
}
