use employee_app_core::db::migrations::latest_version;
use employee_app_core::{
    open_store, DepartmentRepository, ErrorKind, RepoError, SqliteDepartmentRepository,
    StoreConfig, StoreConnector, StoreError,
};
use rusqlite::Connection;
use std::path::Path;

#[test]
fn first_acquire_applies_all_migrations() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("employees.db");

    let connector = StoreConnector::new(StoreConfig::new(&path)).expect("build connector");
    let conn = connector.acquire().expect("acquire connection");

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "Departments");
    assert_table_exists(&conn, "Employees");
}

#[test]
fn reopening_same_database_is_idempotent() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("employees.db");

    let first = StoreConnector::new(StoreConfig::new(&path)).expect("build connector");
    drop(first.acquire().expect("acquire connection"));

    let second = StoreConnector::new(StoreConfig::new(&path)).expect("build connector");
    let conn = second.acquire().expect("acquire connection");
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "Departments");
}

#[test]
fn each_acquire_opens_a_distinct_connection() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let connector = StoreConnector::new(StoreConfig::new(dir.path().join("employees.db")))
        .expect("build connector");

    let first = connector.acquire().expect("acquire connection");
    let second = connector.acquire().expect("acquire connection");
    first
        .execute_batch("CREATE TEMP TABLE scratch (value INTEGER);")
        .expect("run sql batch");

    // Temp tables are per-connection; the second handle must not see it.
    let visible: i64 = second
        .query_row(
            "SELECT count(*) FROM sqlite_temp_master WHERE name = 'scratch';",
            [],
            |row| row.get(0),
        )
        .expect("read single row");
    assert_eq!(visible, 0);
}

#[test]
fn missing_database_without_create_is_a_connection_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("absent.db");

    let connector =
        StoreConnector::new(StoreConfig::new(&path).with_create_if_missing(false))
            .expect("build connector");
    let err = connector.acquire().err().expect("acquire should fail");

    assert!(matches!(err, StoreError::Connection { .. }));
    assert_eq!(err.kind(), ErrorKind::Connection);
    assert_eq!(err.code(), "store_unavailable");
    assert!(!path.exists());
}

#[test]
fn non_database_file_is_a_connection_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "this is a plain text file, not a database\n".repeat(16))
        .expect("write fixture file");

    let connector = StoreConnector::new(StoreConfig::new(&path)).expect("build connector");
    let err = connector.acquire().err().expect("acquire should fail");
    assert_eq!(err.kind(), ErrorKind::Connection);
}

#[test]
fn database_with_newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("future.db");
    set_user_version(&path, 999);

    let executor = open_store(StoreConfig::new(&path)).expect("open store");
    let repo = SqliteDepartmentRepository::new(&executor);
    let err = repo.list().unwrap_err();

    match err {
        RepoError::Store(StoreError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn database_missing_required_column_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("partial.db");
    let conn = Connection::open(&path).expect("open raw connection");
    conn.execute_batch(&format!(
        "CREATE TABLE Departments (DepartmentID INTEGER PRIMARY KEY);
         PRAGMA user_version = {};",
        latest_version()
    ))
    .expect("run sql batch");
    drop(conn);

    let connector = StoreConnector::new(StoreConfig::new(&path)).expect("build connector");
    let err = connector.acquire().err().expect("acquire should fail");
    assert!(matches!(
        err,
        StoreError::MissingRequiredColumn {
            table: "Departments",
            column: "DepartmentName"
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Connection);
}

#[test]
fn invalid_config_is_rejected_before_touching_the_store() {
    let err = StoreConnector::new(StoreConfig::new("")).unwrap_err();
    assert!(matches!(err, StoreError::InvalidConfig(_)));
    assert_eq!(err.kind(), ErrorKind::Connection);
}

#[test]
fn busy_timeout_beyond_driver_range_is_rejected_up_front() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config =
        StoreConfig::new(dir.path().join("employees.db")).with_busy_timeout_ms(u64::MAX);

    let err = open_store(config).unwrap_err();
    assert!(matches!(err, StoreError::InvalidConfig(_)));
    assert!(!dir.path().join("employees.db").exists());
}

#[test]
fn migration_blocked_by_write_lock_is_a_timeout() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("employees.db");
    let holder = Connection::open(&path).expect("open raw connection");
    holder.execute_batch("BEGIN IMMEDIATE;").expect("run sql batch");

    let connector = StoreConnector::new(StoreConfig::new(&path).with_busy_timeout_ms(50))
        .expect("build connector");
    let err = connector.acquire().err().expect("acquire should fail");
    assert!(matches!(err, StoreError::Timeout { budget_ms: 50, .. }));
    assert_eq!(err.kind(), ErrorKind::Timeout);

    // A failed first acquire leaves the schema gate open for the next one.
    holder.execute_batch("ROLLBACK;").expect("run sql batch");
    let conn = connector.acquire().expect("acquire connection");
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn config_deserializes_with_defaults() {
    let config: StoreConfig =
        serde_json::from_str(r#"{ "database_path": "/var/lib/employees.db" }"#)
            .expect("deserialize json");
    assert_eq!(config, StoreConfig::new("/var/lib/employees.db"));

    let tuned: StoreConfig = serde_json::from_str(
        r#"{
            "database_path": "/var/lib/employees.db",
            "create_if_missing": false,
            "statement_timeout_ms": 250
        }"#,
    )
    .expect("deserialize json");
    assert!(!tuned.create_if_missing);
    assert_eq!(tuned.statement_timeout_ms, 250);
    assert_eq!(tuned.busy_timeout_ms, 5_000);
}

fn set_user_version(path: &Path, version: u32) {
    let conn = Connection::open(path).expect("open raw connection");
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .expect("run sql batch");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .expect("read single row")
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .expect("read single row");
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
