//! Department use-case service.
//!
//! # Responsibility
//! - Provide the department CRUD entry points outer interfaces call.
//! - Translate repository results into `Outcome` envelopes.

use super::outcome::{Outcome, OutcomeCode};
use crate::model::department::{Department, DepartmentId, NewDepartment};
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::RepoError;
use log::warn;

/// Use-case service wrapper for department CRUD operations.
pub struct DepartmentService<R: DepartmentRepository> {
    repo: R,
}

impl<R: DepartmentRepository> DepartmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list(&self) -> Outcome<Vec<Department>> {
        match self.repo.list() {
            Ok(departments) => Outcome::success(
                OutcomeCode::Ok,
                format!("Found {} department(s).", departments.len()),
                Some(departments),
            ),
            Err(err) => failed("list", &err),
        }
    }

    pub fn create(&self, department: &NewDepartment) -> Outcome<Department> {
        match self.repo.create(department) {
            Ok(created) => {
                Outcome::success(OutcomeCode::Created, "Added successfully", Some(created))
            }
            Err(err) => failed("add", &err),
        }
    }

    pub fn update(&self, department: &Department) -> Outcome<()> {
        match self.repo.update(department) {
            Ok(_) => Outcome::success(OutcomeCode::Updated, "Updated successfully", None),
            Err(err) => failed("update", &err),
        }
    }

    pub fn delete(&self, id: DepartmentId) -> Outcome<()> {
        match self.repo.delete(id) {
            Ok(_) => Outcome::success(OutcomeCode::Deleted, "Deleted successfully", None),
            Err(err) => failed("delete", &err),
        }
    }
}

fn failed<T>(action: &str, err: &RepoError) -> Outcome<T> {
    warn!(
        "event=department_{} module=service status=error error_code={}",
        action,
        err.code()
    );
    Outcome::failure(action, err)
}
