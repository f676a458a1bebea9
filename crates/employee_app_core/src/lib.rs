//! Data-access core for the employee directory.
//! Departments and employees are persisted through parameterized statements
//! only; every failure reaches the caller as a typed error or outcome code.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use db::{
    ErrorKind, QueryExecutor, RowSet, RowView, SqlValue, StoreConnector, StoreError, StoreResult,
};
pub use logging::{default_log_level, init_logging, LogTarget, LoggingError};
pub use model::department::{Department, DepartmentId, NewDepartment};
pub use model::employee::{parse_doj, Employee, EmployeeId, NewEmployee};
pub use model::ValidationError;
pub use repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::department_service::DepartmentService;
pub use service::employee_service::EmployeeService;
pub use service::outcome::{Outcome, OutcomeCode};

/// Opens a store from a descriptor and returns an executor bound to it.
///
/// The store itself is first touched by the first statement.
pub fn open_store(config: StoreConfig) -> StoreResult<QueryExecutor> {
    Ok(QueryExecutor::new(StoreConnector::new(config)?))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
