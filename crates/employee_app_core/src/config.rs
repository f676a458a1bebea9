//! Store connection descriptor.
//!
//! # Responsibility
//! - Carry everything needed to reach the relational store.
//! - Reject unusable descriptors before any connection attempt.
//!
//! # Invariants
//! - Core code never reads ambient/global configuration; callers construct
//!   a `StoreConfig` and pass it in.

use crate::db::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_STATEMENT_TIMEOUT_MS: u64 = 30_000;
/// Upper bound for both timeouts; the driver takes busy waits as `i32` ms.
const MAX_TIMEOUT_MS: u64 = i32::MAX as u64;

/// Connection descriptor for a SQLite store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file path.
    pub database_path: PathBuf,
    /// When `false`, a missing database file is a connection error.
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
    /// How long a statement may wait on a lock held by another connection.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Upper bound on a single statement's execution time.
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
}

impl StoreConfig {
    /// Creates a descriptor with default timeouts.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            create_if_missing: default_create_if_missing(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            statement_timeout_ms: DEFAULT_STATEMENT_TIMEOUT_MS,
        }
    }

    pub fn with_create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }

    pub fn with_busy_timeout_ms(mut self, busy_timeout_ms: u64) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    pub fn with_statement_timeout_ms(mut self, statement_timeout_ms: u64) -> Self {
        self.statement_timeout_ms = statement_timeout_ms;
        self
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn statement_timeout(&self) -> Duration {
        Duration::from_millis(self.statement_timeout_ms)
    }

    /// Checks the descriptor without touching the store.
    ///
    /// # Errors
    /// - `StoreError::InvalidConfig` when the path is empty or a timeout is
    ///   zero or above `i32::MAX` milliseconds.
    pub fn validate(&self) -> StoreResult<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(StoreError::InvalidConfig(
                "database_path cannot be empty".to_string(),
            ));
        }
        if self.statement_timeout_ms == 0 {
            return Err(StoreError::InvalidConfig(
                "statement_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.statement_timeout_ms > MAX_TIMEOUT_MS {
            return Err(StoreError::InvalidConfig(format!(
                "statement_timeout_ms must not exceed {MAX_TIMEOUT_MS}"
            )));
        }
        if self.busy_timeout_ms == 0 {
            return Err(StoreError::InvalidConfig(
                "busy_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.busy_timeout_ms > MAX_TIMEOUT_MS {
            return Err(StoreError::InvalidConfig(format!(
                "busy_timeout_ms must not exceed {MAX_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

fn default_create_if_missing() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_statement_timeout_ms() -> u64 {
    DEFAULT_STATEMENT_TIMEOUT_MS
}
