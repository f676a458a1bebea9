//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//! - Verify the tables the repositories read and write are present.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.

use crate::db::{StoreError, StoreResult};
use rusqlite::{Connection, TransactionBehavior};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("Departments", &["DepartmentID", "DepartmentName"]),
    (
        "Employees",
        &["EmployeeID", "EmployeeName", "Department", "MailID", "DOJ"],
    ),
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
///
/// Runs inside an immediate transaction so concurrent first connections
/// serialize on the write lock instead of racing each other.
pub fn apply_migrations(conn: &mut Connection) -> StoreResult<()> {
    let latest = latest_version();
    if current_user_version(conn)? == latest {
        return Ok(());
    }

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(StoreError::Migration)?;

    // Re-read under the write lock; another connection may have finished first.
    let current_version = current_user_version(&tx)?;
    if current_version > latest {
        return Err(StoreError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql).map_err(StoreError::Migration)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            .map_err(StoreError::Migration)?;
    }
    tx.commit().map_err(StoreError::Migration)?;

    Ok(())
}

/// Confirms every table/column the repositories depend on exists.
pub fn ensure_schema_ready(conn: &Connection) -> StoreResult<()> {
    for &(table, columns) in REQUIRED_COLUMNS {
        let present = table_columns(conn, table)?;
        for &column in columns {
            if !present.iter().any(|name| name == column) {
                return Err(StoreError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn current_user_version(conn: &Connection) -> StoreResult<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))
        .map_err(StoreError::Migration)
}

fn table_columns(conn: &Connection, table: &str) -> StoreResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1);")
        .map_err(StoreError::Migration)?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(StoreError::Migration)?;
    Ok(names)
}
