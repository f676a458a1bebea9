//! Employee record and date-of-joining coercion.
//!
//! # Invariants
//! - `doj` carries no time-of-day; any time component in the input is dropped.
//! - Offsets are not applied: the date as written is the date kept.
//! - `department` is free text and is not checked against departments.

use super::{require_non_empty, ValidationError};
use crate::db::DATE_FORMAT;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Store-assigned employee identifier.
pub type EmployeeId = i64;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_ONLY_FORMATS: &[&str] = &[DATE_FORMAT, "%m/%d/%Y"];

/// Persisted employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "EmployeeID")]
    pub id: EmployeeId,
    #[serde(rename = "EmployeeName")]
    pub name: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "MailID")]
    pub mail_id: String,
    /// Date of joining, serialized as `YYYY-MM-DD`.
    #[serde(rename = "DOJ", with = "doj_format")]
    pub doj: NaiveDate,
}

impl Employee {
    /// Checks the mutable fields an update would write.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("Employee", "EmployeeName", &self.name)
    }
}

/// Employee input without an identifier, used by create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    #[serde(rename = "EmployeeName")]
    pub name: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "MailID")]
    pub mail_id: String,
    #[serde(rename = "DOJ", with = "doj_format")]
    pub doj: NaiveDate,
}

impl NewEmployee {
    pub fn new(
        name: impl Into<String>,
        department: impl Into<String>,
        mail_id: impl Into<String>,
        doj: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            department: department.into(),
            mail_id: mail_id.into(),
            doj,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("Employee", "EmployeeName", &self.name)
    }

    /// Attaches the store-assigned identifier.
    pub fn into_employee(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            name: self.name,
            department: self.department,
            mail_id: self.mail_id,
            doj: self.doj,
        }
    }
}

/// Normalizes a date-of-joining input to a calendar date.
///
/// Accepts a bare date, a local date-time, an RFC 3339 timestamp, or the
/// `M/D/YYYY [h:mm:ss AM]` form; the time part is discarded in every case.
///
/// # Errors
/// - `ValidationError::InvalidDate` for anything else.
pub fn parse_doj(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();

    for format in DATE_ONLY_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(date_time.date());
        }
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date_time.date_naive());
    }

    Err(ValidationError::InvalidDate(trimmed.to_string()))
}

mod doj_format {
    use super::parse_doj;
    use crate::db::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_doj(&raw).map_err(serde::de::Error::custom)
    }
}
