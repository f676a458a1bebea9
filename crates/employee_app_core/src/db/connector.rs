//! Per-operation connection scoping for the SQLite store.
//!
//! # Responsibility
//! - Open one connection per operation from an explicit `StoreConfig`.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations once per connector before first use.
//!
//! # Invariants
//! - Connections are never cached across operations.
//! - A `ScopedConnection` closes its connection on every exit path.

use super::migrations::{apply_migrations, ensure_schema_ready};
use super::{StoreError, StoreResult};
use crate::config::StoreConfig;
use log::{debug, error, info};
use once_cell::sync::OnceCell;
use rusqlite::{Connection, OpenFlags};
use std::ops::Deref;
use std::time::Instant;

/// Resolves connections to the configured store.
#[derive(Debug)]
pub struct StoreConnector {
    config: StoreConfig,
    schema_ready: OnceCell<()>,
}

impl StoreConnector {
    /// Builds a connector from a validated descriptor.
    ///
    /// No connection is opened here; the store is first touched by `acquire`.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            schema_ready: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Opens a connection scoped to the caller.
    ///
    /// # Errors
    /// - `StoreError::Connection` when the store cannot be opened.
    /// - Migration/schema errors when the store layout is unusable.
    ///
    /// # Side effects
    /// - Emits `db_acquire` events; failures carry the error code.
    pub fn acquire(&self) -> StoreResult<ScopedConnection> {
        let started_at = Instant::now();

        match self.open() {
            Ok(conn) => {
                debug!(
                    "event=db_acquire module=db status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(ScopedConnection {
                    conn,
                    acquired_at: Instant::now(),
                })
            }
            Err(err) => {
                error!(
                    "event=db_acquire module=db status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn open(&self) -> StoreResult<Connection> {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.config.create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }

        let path = self.config.database_path();
        let mut conn =
            Connection::open_with_flags(path, flags).map_err(|source| StoreError::Connection {
                path: path.display().to_string(),
                source,
            })?;

        conn.busy_timeout(self.config.busy_timeout())
            .map_err(|source| StoreError::Connection {
                path: path.display().to_string(),
                source,
            })?;

        self.schema_ready.get_or_try_init(|| -> StoreResult<()> {
            apply_migrations(&mut conn)
                .map_err(|err| err.classify_lock_wait(self.config.busy_timeout_ms))?;
            ensure_schema_ready(&conn)?;
            info!(
                "event=schema_ready module=db status=ok path={}",
                path.display()
            );
            Ok(())
        })?;

        Ok(conn)
    }
}

/// Connection held for the duration of one operation.
///
/// Dropping the guard closes the underlying connection.
pub struct ScopedConnection {
    conn: Connection,
    acquired_at: Instant,
}

impl Deref for ScopedConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        debug!(
            "event=db_release module=db status=ok held_ms={}",
            self.acquired_at.elapsed().as_millis()
        );
    }
}
