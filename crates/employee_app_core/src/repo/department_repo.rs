//! Department repository contract and SQLite implementation.
//!
//! # Invariants
//! - `DepartmentID` is never written by update; it only selects the row.
//! - An empty table lists as an empty vector.

use super::{require_affected, EntityKind, RepoResult};
use crate::db::{QueryExecutor, RowView, SqlValue, StoreError, StoreResult};
use crate::model::department::{Department, DepartmentId, NewDepartment};

const LIST_SQL: &str = "SELECT DepartmentID, DepartmentName FROM Departments;";

const INSERT_SQL: &str = "INSERT INTO Departments (DepartmentName)
     VALUES (?1)
     RETURNING DepartmentID, DepartmentName;";

const UPDATE_SQL: &str = "UPDATE Departments
     SET DepartmentName = ?1
     WHERE DepartmentID = ?2;";

const DELETE_SQL: &str = "DELETE FROM Departments WHERE DepartmentID = ?1;";

/// Repository interface for department CRUD operations.
pub trait DepartmentRepository {
    fn list(&self) -> RepoResult<Vec<Department>>;
    fn create(&self, department: &NewDepartment) -> RepoResult<Department>;
    /// Replaces all mutable fields; zero matched rows is `NotFound`.
    fn update(&self, department: &Department) -> RepoResult<usize>;
    /// Zero matched rows is `NotFound`.
    fn delete(&self, id: DepartmentId) -> RepoResult<usize>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'store> {
    executor: &'store QueryExecutor,
}

impl<'store> SqliteDepartmentRepository<'store> {
    pub fn new(executor: &'store QueryExecutor) -> Self {
        Self { executor }
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn list(&self) -> RepoResult<Vec<Department>> {
        let rows = self.executor.query(LIST_SQL, &[])?;
        let departments = rows
            .rows()
            .map(parse_department_row)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(departments)
    }

    fn create(&self, department: &NewDepartment) -> RepoResult<Department> {
        department.validate()?;

        let rows = self
            .executor
            .query(INSERT_SQL, &[SqlValue::from(department.name.as_str())])?;
        let row = rows.first().ok_or(StoreError::Decode {
            column: "DepartmentID".to_string(),
            expected: "inserted row",
            found: "no row",
        })?;
        Ok(parse_department_row(row)?)
    }

    fn update(&self, department: &Department) -> RepoResult<usize> {
        department.validate()?;

        let affected = self.executor.execute(
            UPDATE_SQL,
            &[
                SqlValue::from(department.name.as_str()),
                SqlValue::from(department.id),
            ],
        )?;
        require_affected(affected, EntityKind::Department, department.id)
    }

    fn delete(&self, id: DepartmentId) -> RepoResult<usize> {
        let affected = self.executor.execute(DELETE_SQL, &[SqlValue::from(id)])?;
        require_affected(affected, EntityKind::Department, id)
    }
}

fn parse_department_row(row: RowView<'_>) -> StoreResult<Department> {
    Ok(Department {
        id: row.integer("DepartmentID")?,
        name: row.text("DepartmentName")?.to_string(),
    })
}
