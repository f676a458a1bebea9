//! Employee repository contract and SQLite implementation.
//!
//! # Invariants
//! - `DOJ` is bound as a date-only value and read back as one.
//! - `Department` is stored as given; no lookup against `Departments`.

use super::{require_affected, EntityKind, RepoResult};
use crate::db::{QueryExecutor, RowView, SqlValue, StoreError, StoreResult};
use crate::model::employee::{Employee, EmployeeId, NewEmployee};

const LIST_SQL: &str = "SELECT EmployeeID, EmployeeName, Department, MailID, DOJ FROM Employees;";

const INSERT_SQL: &str = "INSERT INTO Employees (EmployeeName, Department, MailID, DOJ)
     VALUES (?1, ?2, ?3, ?4)
     RETURNING EmployeeID, EmployeeName, Department, MailID, DOJ;";

const UPDATE_SQL: &str = "UPDATE Employees
     SET
        EmployeeName = ?1,
        Department = ?2,
        MailID = ?3,
        DOJ = ?4
     WHERE EmployeeID = ?5;";

const DELETE_SQL: &str = "DELETE FROM Employees WHERE EmployeeID = ?1;";

/// Repository interface for employee CRUD operations.
pub trait EmployeeRepository {
    fn list(&self) -> RepoResult<Vec<Employee>>;
    fn create(&self, employee: &NewEmployee) -> RepoResult<Employee>;
    /// Replaces all mutable fields; zero matched rows is `NotFound`.
    fn update(&self, employee: &Employee) -> RepoResult<usize>;
    /// Zero matched rows is `NotFound`.
    fn delete(&self, id: EmployeeId) -> RepoResult<usize>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'store> {
    executor: &'store QueryExecutor,
}

impl<'store> SqliteEmployeeRepository<'store> {
    pub fn new(executor: &'store QueryExecutor) -> Self {
        Self { executor }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn list(&self) -> RepoResult<Vec<Employee>> {
        let rows = self.executor.query(LIST_SQL, &[])?;
        let employees = rows
            .rows()
            .map(parse_employee_row)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(employees)
    }

    fn create(&self, employee: &NewEmployee) -> RepoResult<Employee> {
        employee.validate()?;

        let rows = self.executor.query(
            INSERT_SQL,
            &[
                SqlValue::from(employee.name.as_str()),
                SqlValue::from(employee.department.as_str()),
                SqlValue::from(employee.mail_id.as_str()),
                SqlValue::from(employee.doj),
            ],
        )?;
        let row = rows.first().ok_or(StoreError::Decode {
            column: "EmployeeID".to_string(),
            expected: "inserted row",
            found: "no row",
        })?;
        Ok(parse_employee_row(row)?)
    }

    fn update(&self, employee: &Employee) -> RepoResult<usize> {
        employee.validate()?;

        let affected = self.executor.execute(
            UPDATE_SQL,
            &[
                SqlValue::from(employee.name.as_str()),
                SqlValue::from(employee.department.as_str()),
                SqlValue::from(employee.mail_id.as_str()),
                SqlValue::from(employee.doj),
                SqlValue::from(employee.id),
            ],
        )?;
        require_affected(affected, EntityKind::Employee, employee.id)
    }

    fn delete(&self, id: EmployeeId) -> RepoResult<usize> {
        let affected = self.executor.execute(DELETE_SQL, &[SqlValue::from(id)])?;
        require_affected(affected, EntityKind::Employee, id)
    }
}

fn parse_employee_row(row: RowView<'_>) -> StoreResult<Employee> {
    Ok(Employee {
        id: row.integer("EmployeeID")?,
        name: row.text("EmployeeName")?.to_string(),
        department: row.text("Department")?.to_string(),
        mail_id: row.text("MailID")?.to_string(),
        doj: row.date("DOJ")?,
    })
}
