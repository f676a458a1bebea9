//! Department and employee records.
//!
//! # Responsibility
//! - Define the canonical records exchanged with repository callers.
//! - Own input validation and value coercion (notably date-of-joining).
//!
//! # Invariants
//! - Identifiers are store-assigned and never changed by the model.
//! - Names must contain at least one non-whitespace character.

use crate::db::ErrorKind;
use thiserror::Error;

pub mod department;
pub mod employee;

/// Input rejected before any statement is sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{entity}.{field} cannot be empty")]
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("unrecognized date of joining `{0}`")]
    InvalidDate(String),
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

pub(crate) fn require_non_empty(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    Ok(())
}
