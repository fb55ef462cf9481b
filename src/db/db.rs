//! The process-wide store client.
//!
//! A [`Db`] wraps one SQLite connection behind a `tokio` mutex, so at most one
//! statement is in flight no matter how many tasks share the handle. Every
//! call goes through [`Db::with_conn`], which retries `BUSY`/`LOCKED`
//! failures a configured number of times with a fixed pause.

use super::error::{DbError, DbResult};
use super::migrations::init_with_migrations;
use super::record::RecordSet;
use crate::libs::config::DatabaseConfig;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, Row, Transaction};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Name of the SQL function used for case-insensitive matching.
pub const CASEFOLD_FN: &str = "casefold";

#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

/// Cloneable handle to the shared connection.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Option<Connection>>>,
    retry: RetryPolicy,
}

impl Db {
    /// Opens (creating if needed) the configured database and brings its
    /// schema up to date.
    pub fn open(config: &DatabaseConfig) -> DbResult<Db> {
        Self::connect(config, true)
    }

    /// Opens the configured database as it is on disk, without applying
    /// pending migrations. Used to inspect the schema version.
    pub fn open_unmigrated(config: &DatabaseConfig) -> DbResult<Db> {
        Self::connect(config, false)
    }

    fn connect(config: &DatabaseConfig, migrate: bool) -> DbResult<Db> {
        let mut conn = if config.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = config.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Connection::open(&config.path)?
        };

        configure(&conn, config)?;
        if migrate {
            init_with_migrations(&mut conn)?;
        }
        tracing::debug!(path = %config.path.display(), migrate, "database opened");

        Ok(Db {
            conn: Arc::new(Mutex::new(Some(conn))),
            retry: RetryPolicy {
                attempts: config.retry_attempts.max(1),
                delay: config.retry_delay(),
            },
        })
    }

    /// Opens a private in-memory database with default settings.
    pub fn open_in_memory() -> DbResult<Db> {
        Self::open(&DatabaseConfig::in_memory())
    }

    /// Closes the connection. Every later call on any clone of this handle
    /// fails with [`DbError::NotInitialized`].
    pub async fn close(&self) -> DbResult<()> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, err)| DbError::from(err))?;
            tracing::debug!("database closed");
        }
        Ok(())
    }

    /// Whether the connection is still held, i.e. [`Db::close`] has not run.
    pub async fn is_open(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Runs `op` on the connection under the client lock, retrying transient
    /// failures. The lock is held for the whole retry cycle.
    pub async fn with_conn<T, F>(&self, mut op: F) -> DbResult<T>
    where
        F: FnMut(&mut Connection) -> DbResult<T>,
    {
        let mut guard = self.conn.lock().await;
        let mut attempt = 1;
        loop {
            let result = match guard.as_mut() {
                Some(conn) => op(conn),
                None => return Err(DbError::NotInitialized),
            };
            match result {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.retry.attempts => {
                    tracing::warn!(attempt, max = self.retry.attempts, error = %err, "transient database error, retrying");
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_transient() {
                        tracing::error!(attempts = attempt, error = %err, "database error after retries");
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Runs a SELECT and collects every row. `fresh` discards cached
    /// prepared statements first.
    pub async fn query(&self, sql: &str, params: &[Value], fresh: bool) -> DbResult<RecordSet> {
        self.with_conn(|conn| {
            if fresh {
                conn.flush_prepared_statement_cache();
            }
            let mut stmt = conn.prepare_cached(sql)?;
            Ok(RecordSet::collect(&mut stmt, params)?)
        })
        .await
    }

    /// Runs a SELECT mapping each row with `map`.
    pub async fn query_map<T>(&self, sql: &str, params: &[Value], map: fn(&Row<'_>) -> rusqlite::Result<T>) -> DbResult<Vec<T>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(sql)?;
            let rows = stmt.query_map(params_from_iter(params.iter()), map)?;
            Ok(rows.collect::<rusqlite::Result<Vec<T>>>()?)
        })
        .await
    }

    /// Runs a statement returning one integer, e.g. `SELECT COUNT(*)`.
    pub async fn scalar(&self, sql: &str, params: &[Value]) -> DbResult<i64> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(sql)?;
            let value: Option<i64> = stmt.query_row(params_from_iter(params.iter()), |row| row.get(0))?;
            Ok(value.unwrap_or(0))
        })
        .await
    }

    /// Runs a write and returns the number of affected rows.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> DbResult<usize> {
        tracing::debug!(sql = %first_word(sql), "executing statement");
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(sql)?;
            Ok(stmt.execute(params_from_iter(params.iter()))?)
        })
        .await
    }

    /// Runs an INSERT and returns the new row id.
    pub async fn insert(&self, sql: &str, params: &[Value]) -> DbResult<i64> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(sql)?;
            stmt.execute(params_from_iter(params.iter()))?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// Runs `body` inside one transaction. A failure rolls everything back
    /// and is reported as [`DbError::RolledBack`].
    pub async fn transaction<T, F>(&self, operation: &'static str, mut body: F) -> DbResult<T>
    where
        F: FnMut(&Transaction<'_>) -> DbResult<T>,
    {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let value = body(&tx)?;
            tx.commit()?;
            Ok(value)
        })
        .await
        .map_err(|err| {
            tracing::error!(operation, error = %err, "transaction rolled back");
            DbError::RolledBack {
                operation,
                source: Box::new(err),
            }
        })
    }
}

fn configure(conn: &Connection, config: &DatabaseConfig) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(config.busy_timeout())?;
    conn.set_prepared_statement_cache_capacity(64);
    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let folded = match ctx.get_raw(0) {
                ValueRef::Null | ValueRef::Blob(_) => None,
                ValueRef::Integer(value) => Some(value.to_string()),
                ValueRef::Real(value) => Some(value.to_string()),
                ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).to_lowercase()),
            };
            Ok(folded)
        },
    )
}

fn first_word(sql: &str) -> &str {
    sql.split_whitespace().next().unwrap_or("")
}
