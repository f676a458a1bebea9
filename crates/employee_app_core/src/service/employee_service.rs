//! Employee use-case service.
//!
//! # Responsibility
//! - Provide the employee CRUD entry points outer interfaces call.
//! - Translate repository results into `Outcome` envelopes.

use super::outcome::{Outcome, OutcomeCode};
use crate::model::employee::{Employee, EmployeeId, NewEmployee};
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::RepoError;
use log::warn;

/// Use-case service wrapper for employee CRUD operations.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list(&self) -> Outcome<Vec<Employee>> {
        match self.repo.list() {
            Ok(employees) => Outcome::success(
                OutcomeCode::Ok,
                format!("Found {} employee(s).", employees.len()),
                Some(employees),
            ),
            Err(err) => failed("list", &err),
        }
    }

    pub fn create(&self, employee: &NewEmployee) -> Outcome<Employee> {
        match self.repo.create(employee) {
            Ok(created) => {
                Outcome::success(OutcomeCode::Created, "Added successfully", Some(created))
            }
            Err(err) => failed("add", &err),
        }
    }

    pub fn update(&self, employee: &Employee) -> Outcome<()> {
        match self.repo.update(employee) {
            Ok(_) => Outcome::success(OutcomeCode::Updated, "Updated successfully", None),
            Err(err) => failed("update", &err),
        }
    }

    pub fn delete(&self, id: EmployeeId) -> Outcome<()> {
        match self.repo.delete(id) {
            Ok(_) => Outcome::success(OutcomeCode::Deleted, "Deleted successfully", None),
            Err(err) => failed("delete", &err),
        }
    }
}

fn failed<T>(action: &str, err: &RepoError) -> Outcome<T> {
    warn!(
        "event=employee_{} module=service status=error error_code={}",
        action,
        err.code()
    );
    Outcome::failure(action, err)
}
