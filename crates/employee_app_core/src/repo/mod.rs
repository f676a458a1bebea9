//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Map department/employee records to and from storage rows.
//! - Turn zero-row mutations into explicit `NotFound` errors.
//!
//! # Invariants
//! - Write paths validate input before any statement is sent.
//! - Repository APIs return semantic errors (`NotFound`, `Validation`) in
//!   addition to store errors, never a generic catch-all.

use crate::db::{ErrorKind, StoreError};
use crate::model::ValidationError;
use std::fmt::{Display, Formatter};
use thiserror::Error;

pub mod department_repo;
pub mod employee_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity collection an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Department,
    Employee,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Department => write!(f, "department"),
            Self::Employee => write!(f, "employee"),
        }
    }
}

/// Error returned by every repository operation.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: i64 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(err) => err.kind(),
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Store(err) => err.kind(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

/// Converts an affected-row count into `NotFound` when nothing matched.
pub(crate) fn require_affected(affected: usize, entity: EntityKind, id: i64) -> RepoResult<usize> {
    if affected == 0 {
        return Err(RepoError::NotFound { entity, id });
    }
    Ok(affected)
}
