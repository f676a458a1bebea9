use chrono::NaiveDate;
use employee_app_core::{open_store, ErrorKind, QueryExecutor, SqlValue, StoreConfig, StoreError};
use rusqlite::Connection;
use tempfile::TempDir;

fn open_temp_store(config: impl FnOnce(StoreConfig) -> StoreConfig) -> (TempDir, QueryExecutor) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let executor = open_store(config(StoreConfig::new(dir.path().join("employees.db"))))
        .expect("open store");
    (dir, executor)
}

#[test]
fn query_preserves_column_names_and_inferred_types() {
    let (_dir, executor) = open_temp_store(|config| config);

    let affected = executor
        .execute(
            "INSERT INTO Employees (EmployeeName, Department, MailID, DOJ)
             VALUES (?1, ?2, ?3, ?4);",
            &[
                SqlValue::from("Ada"),
                SqlValue::from("Engineering"),
                SqlValue::from("ada@example.com"),
                SqlValue::from(NaiveDate::from_ymd_opt(2023, 5, 10).expect("valid calendar date")),
            ],
        )
        .expect("run statement");
    assert_eq!(affected, 1);

    let rows = executor
        .query(
            "SELECT EmployeeID, EmployeeName, DOJ FROM Employees WHERE EmployeeName = ?1;",
            &[SqlValue::from("Ada")],
        )
        .expect("run query");

    assert_eq!(rows.columns(), ["EmployeeID", "EmployeeName", "DOJ"]);
    assert_eq!(rows.len(), 1);
    let row = rows.first().expect("result has a first row");
    assert_eq!(row.get("EmployeeID"), Some(&SqlValue::Integer(1)));
    assert_eq!(row.text("EmployeeName").expect("decode text column"), "Ada");
    assert_eq!(
        row.get("DOJ"),
        Some(&SqlValue::Date(NaiveDate::from_ymd_opt(2023, 5, 10).expect("valid calendar date")))
    );
    assert!(row.get("MailID").is_none());
}

#[test]
fn query_reports_null_and_real_values() {
    let (_dir, executor) = open_temp_store(|config| config);

    let rows = executor
        .query("SELECT NULL AS nothing, 1.5 AS ratio;", &[])
        .expect("run query");
    let row = rows.first().expect("result has a first row");
    assert_eq!(row.get("nothing"), Some(&SqlValue::Null));
    assert_eq!(row.get("ratio"), Some(&SqlValue::Real(1.5)));

    let err = row.text("ratio").unwrap_err();
    assert!(matches!(err, StoreError::Decode { found: "real", .. }));
    assert_eq!(err.kind(), ErrorKind::Query);

    let missing = row.integer("absent").unwrap_err();
    assert!(missing.to_string().contains("absent"));
}

#[test]
fn query_on_empty_table_returns_empty_row_set() {
    let (_dir, executor) = open_temp_store(|config| config);

    let rows = executor
        .query("SELECT DepartmentID, DepartmentName FROM Departments;", &[])
        .expect("run query");
    assert!(rows.is_empty());
    assert_eq!(rows.columns(), ["DepartmentID", "DepartmentName"]);
}

#[test]
fn bound_text_is_stored_literally() {
    let (_dir, executor) = open_temp_store(|config| config);
    let hostile = "x'); DROP TABLE Departments; --";

    executor
        .execute(
            "INSERT INTO Departments (DepartmentName) VALUES (?1);",
            &[SqlValue::from(hostile)],
        )
        .expect("run statement");

    let rows = executor
        .query(
            "SELECT DepartmentName FROM Departments WHERE DepartmentName = ?1;",
            &[SqlValue::from(hostile)],
        )
        .expect("run query");
    assert_eq!(rows.len(), 1);
    let row = rows.first().expect("result has a first row");
    assert_eq!(row.text("DepartmentName").expect("decode text column"), hostile);
}

#[test]
fn execute_reports_zero_when_nothing_matches() {
    let (_dir, executor) = open_temp_store(|config| config);

    let affected = executor
        .execute(
            "DELETE FROM Departments WHERE DepartmentID = ?1;",
            &[SqlValue::from(404)],
        )
        .expect("run statement");
    assert_eq!(affected, 0);
}

#[test]
fn constraint_violation_is_a_query_error() {
    let (_dir, executor) = open_temp_store(|config| config);

    let err = executor
        .execute(
            "INSERT INTO Departments (DepartmentName) VALUES (?1);",
            &[SqlValue::from("   ")],
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::Query(_)));
    assert_eq!(err.code(), "query_failed");
}

#[test]
fn malformed_statement_is_a_query_error() {
    let (_dir, executor) = open_temp_store(|config| config);

    let err = executor.query("SELEC nothing FROM nowhere;", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Query);

    let wrong_arity = executor
        .execute(
            "UPDATE Departments SET DepartmentName = ?1 WHERE DepartmentID = ?2;",
            &[SqlValue::from("only one")],
        )
        .unwrap_err();
    assert_eq!(wrong_arity.kind(), ErrorKind::Query);
}

#[test]
fn runaway_statement_times_out() {
    let (_dir, executor) = open_temp_store(|config| config.with_statement_timeout_ms(50));

    let err = executor
        .query(
            "WITH RECURSIVE counter(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM counter)
             SELECT count(*) FROM counter;",
            &[],
        )
        .unwrap_err();

    assert!(matches!(err, StoreError::Timeout { budget_ms: 50, .. }));
    assert_eq!(err.kind(), ErrorKind::Timeout);

    // The budget is per statement; the next one runs normally.
    let rows = executor.query("SELECT 1 AS one;", &[]).expect("run query");
    let row = rows.first().expect("result has a first row");
    assert_eq!(row.integer("one").expect("decode integer column"), 1);
}

#[test]
fn lock_wait_beyond_busy_timeout_is_a_timeout() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("employees.db");
    let executor =
        open_store(StoreConfig::new(&path).with_busy_timeout_ms(50)).expect("open store");
    executor
        .query("SELECT DepartmentID FROM Departments;", &[])
        .expect("run query");

    let holder = Connection::open(&path).expect("open raw connection");
    holder.execute_batch("BEGIN IMMEDIATE;").expect("run sql batch");

    let err = executor
        .execute(
            "INSERT INTO Departments (DepartmentName) VALUES (?1);",
            &[SqlValue::from("Blocked")],
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);

    holder.execute_batch("ROLLBACK;").expect("run sql batch");
}
