//! Parameterized statement execution and typed row-sets.
//!
//! # Responsibility
//! - Run read and write statements through bound positional parameters.
//! - Bound each statement's execution time.
//! - Map result rows to a column-named, typed `RowSet`.
//!
//! # Invariants
//! - Statement templates are `&'static str`; runtime values never become
//!   statement text.
//! - Logged events carry metadata only, never parameter values.

use super::{ScopedConnection, StoreConnector, StoreError, StoreResult};
use chrono::NaiveDate;
use log::{debug, warn};
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, Statement, ToSql};
use std::sync::Arc;
use std::time::Instant;

/// Storage format for date values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of VM instructions between deadline checks.
const PROGRESS_CHECK_INTERVAL: i32 = 1_000;

/// Typed value crossing the store boundary in either direction.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    Blob(Vec<u8>),
}

impl SqlValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::Blob(_) => "blob",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(Value::Null),
            Self::Integer(value) => ToSqlOutput::Owned(Value::Integer(*value)),
            Self::Real(value) => ToSqlOutput::Owned(Value::Real(*value)),
            Self::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
            Self::Date(value) => {
                ToSqlOutput::Owned(Value::Text(value.format(DATE_FORMAT).to_string()))
            }
            Self::Blob(value) => ToSqlOutput::Borrowed(ValueRef::Blob(value)),
        })
    }
}

/// Ordered rows returned by a read, each addressable by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    columns: Arc<[String]>,
    rows: Vec<Vec<SqlValue>>,
}

impl RowSet {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(|values| RowView {
            columns: &self.columns,
            values,
        })
    }

    pub fn first(&self) -> Option<RowView<'_>> {
        self.rows().next()
    }
}

/// Borrowed view of one row in a `RowSet`.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    columns: &'a [String],
    values: &'a [SqlValue],
}

impl<'a> RowView<'a> {
    /// Returns the raw value of `column`, if the column exists.
    pub fn get(&self, column: &str) -> Option<&'a SqlValue> {
        let values = self.values;
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|index| &values[index])
    }

    pub fn integer(&self, column: &str) -> StoreResult<i64> {
        match self.require(column)? {
            SqlValue::Integer(value) => Ok(*value),
            other => Err(decode_error(column, "integer", other)),
        }
    }

    pub fn text(&self, column: &str) -> StoreResult<&'a str> {
        match self.require(column)? {
            SqlValue::Text(value) => Ok(value.as_str()),
            other => Err(decode_error(column, "text", other)),
        }
    }

    /// Reads a date column.
    ///
    /// Columns without a declared `DATE` type (e.g. `RETURNING` output) come
    /// back as text and are parsed with `DATE_FORMAT`.
    pub fn date(&self, column: &str) -> StoreResult<NaiveDate> {
        match self.require(column)? {
            SqlValue::Date(value) => Ok(*value),
            SqlValue::Text(value) => parse_stored_date(column, value),
            other => Err(decode_error(column, "date", other)),
        }
    }

    fn require(&self, column: &str) -> StoreResult<&'a SqlValue> {
        self.get(column).ok_or_else(|| StoreError::Decode {
            column: column.to_string(),
            expected: "present column",
            found: "missing",
        })
    }
}

fn decode_error(column: &str, expected: &'static str, found: &SqlValue) -> StoreError {
    StoreError::Decode {
        column: column.to_string(),
        expected,
        found: found.type_name(),
    }
}

/// Runs parameterized statements against connections from a `StoreConnector`.
#[derive(Debug)]
pub struct QueryExecutor {
    connector: StoreConnector,
}

impl QueryExecutor {
    pub fn new(connector: StoreConnector) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &StoreConnector {
        &self.connector
    }

    /// Executes a statement that yields rows and collects them.
    ///
    /// Also used for writes with a `RETURNING` clause.
    ///
    /// # Errors
    /// - Connection errors from acquisition.
    /// - `StoreError::Timeout` when the statement exceeds its budget.
    /// - `StoreError::Query`/`Decode` for anything the store rejects.
    pub fn query(&self, template: &'static str, params: &[SqlValue]) -> StoreResult<RowSet> {
        let rows = self.run("query", template, |conn| {
            let mut stmt = conn.prepare(template)?;
            collect_rows(&mut stmt, params)
        })?;
        debug!("event=db_query module=db status=ok rows={}", rows.len());
        Ok(rows)
    }

    /// Executes a write statement and returns the affected row count.
    pub fn execute(&self, template: &'static str, params: &[SqlValue]) -> StoreResult<usize> {
        let affected = self.run("execute", template, |conn| {
            Ok(conn.execute(template, params_from_iter(params.iter()))?)
        })?;
        debug!("event=db_execute module=db status=ok affected_rows={affected}");
        Ok(affected)
    }

    fn run<T>(
        &self,
        operation: &'static str,
        template: &'static str,
        statement: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let conn = self.connector.acquire()?;
        let config = self.connector.config();
        let started_at = Instant::now();

        arm_deadline(&conn, started_at + config.statement_timeout());
        let result = statement(&*conn);
        disarm_deadline(&conn);

        result.map_err(|err| {
            let err = err.classify_interrupt(config.statement_timeout_ms);
            warn!(
                "event=db_{} module=db status=error duration_ms={} error_code={} statement={} error={}",
                operation,
                started_at.elapsed().as_millis(),
                err.code(),
                statement_label(template),
                err
            );
            err
        })
    }
}

fn arm_deadline(conn: &ScopedConnection, deadline: Instant) {
    conn.progress_handler(
        PROGRESS_CHECK_INTERVAL,
        Some(move || Instant::now() >= deadline),
    );
}

fn disarm_deadline(conn: &ScopedConnection) {
    conn.progress_handler(0, None::<fn() -> bool>);
}

fn collect_rows(stmt: &mut Statement<'_>, params: &[SqlValue]) -> StoreResult<RowSet> {
    let columns: Arc<[String]> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let declared_dates: Vec<bool> = stmt
        .columns()
        .iter()
        .map(|column| {
            column
                .decl_type()
                .is_some_and(|decl| decl.eq_ignore_ascii_case("DATE"))
        })
        .collect();

    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    let mut collected = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for (index, is_date) in declared_dates.iter().enumerate() {
            values.push(decode_value(&columns[index], row.get_ref(index)?, *is_date)?);
        }
        collected.push(values);
    }

    Ok(RowSet {
        columns,
        rows: collected,
    })
}

fn decode_value(column: &str, raw: ValueRef<'_>, declared_date: bool) -> StoreResult<SqlValue> {
    let value = match raw {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(value) => SqlValue::Integer(value),
        ValueRef::Real(value) => SqlValue::Real(value),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|_| StoreError::Decode {
                column: column.to_string(),
                expected: "utf-8 text",
                found: "invalid utf-8",
            })?;
            if declared_date {
                SqlValue::Date(parse_stored_date(column, text)?)
            } else {
                SqlValue::Text(text.to_string())
            }
        }
        ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
    };
    Ok(value)
}

fn parse_stored_date(column: &str, text: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| StoreError::Decode {
        column: column.to_string(),
        expected: "date",
        found: "text",
    })
}

/// First keyword pair of a template, enough to identify it in logs.
fn statement_label(template: &str) -> String {
    template
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{decode_value, statement_label, SqlValue};
    use chrono::NaiveDate;
    use rusqlite::types::ValueRef;

    #[test]
    fn declared_date_text_decodes_to_date() {
        let value = decode_value("DOJ", ValueRef::Text(b"2023-05-10"), true).unwrap();
        assert_eq!(
            value,
            SqlValue::Date(NaiveDate::from_ymd_opt(2023, 5, 10).unwrap())
        );
    }

    #[test]
    fn malformed_date_text_is_a_decode_error() {
        let err = decode_value("DOJ", ValueRef::Text(b"10/05/2023"), true).unwrap_err();
        assert!(err.to_string().contains("DOJ"));
    }

    #[test]
    fn undeclared_text_stays_text() {
        let value = decode_value("MailID", ValueRef::Text(b"2023-05-10"), false).unwrap();
        assert_eq!(value, SqlValue::Text("2023-05-10".to_string()));
    }

    #[test]
    fn statement_label_keeps_leading_keywords_only() {
        assert_eq!(
            statement_label("DELETE FROM Departments WHERE DepartmentID = ?1"),
            "delete_from"
        );
    }
}
