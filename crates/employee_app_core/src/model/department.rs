//! Department record.

use super::{require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned department identifier.
pub type DepartmentId = i64;

/// Persisted department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "DepartmentID")]
    pub id: DepartmentId,
    #[serde(rename = "DepartmentName")]
    pub name: String,
}

impl Department {
    pub fn new(id: DepartmentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Checks the mutable fields an update would write.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("Department", "DepartmentName", &self.name)
    }
}

/// Department input without an identifier, used by create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDepartment {
    #[serde(rename = "DepartmentName")]
    pub name: String,
}

impl NewDepartment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("Department", "DepartmentName", &self.name)
    }
}
