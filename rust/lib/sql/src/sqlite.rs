use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::types::{ToSql, ValueRef};
use rusqlite::{ffi, Connection, ErrorCode};
use tracing::debug;

use crate::error::SQLError;
use crate::traits::{Row, SQLStore, Value};

/// SqliteStore is a SQLStore backed by a single rusqlite connection (bundled SQLite).
///
/// The connection lives for the lifetime of the store and is handed out to
/// one caller at a time through the mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database file, creating missing parent directories.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        Self::open_with_timeout(path, Duration::from_secs(5))
    }

    pub fn open_with_timeout(path: &Path, busy_timeout: Duration) -> Result<Self, SQLError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SQLError::Connection(format!("{}: {}", parent.display(), e)))?;
        }

        let conn = Connection::open(path)
            .map_err(|e| SQLError::Connection(format!("{}: {}", path.display(), e)))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        declared_foreign_keys(&conn)?;
        conn.busy_timeout(busy_timeout)
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        debug!("opened sqlite database at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, gone when the store is dropped. Used by tests.
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        declared_foreign_keys(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SQLError> {
        self.conn
            .lock()
            .map_err(|e| SQLError::Connection(format!("connection lock poisoned: {e}")))
    }
}

/// Foreign keys are declarations only. The bundled SQLite is built with
/// enforcement on by default, so switch it off per connection.
fn declared_foreign_keys(conn: &Connection) -> Result<(), SQLError> {
    conn.execute_batch("PRAGMA foreign_keys = OFF;")
        .map_err(|e| SQLError::Connection(e.to_string()))
}

fn as_sql(value: &Value) -> &dyn ToSql {
    match value {
        Value::Null => &rusqlite::types::Null,
        Value::Integer(i) => i,
        Value::Real(f) => f,
        Value::Text(s) => s,
        Value::Blob(b) => b,
    }
}

fn bind_params(params: &[Value]) -> Vec<&dyn ToSql> {
    params.iter().map(as_sql).collect()
}

/// Map a write failure, pulling unique/primary-key violations out of the generic bucket.
fn write_error(err: rusqlite::Error) -> SQLError {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
        if failure.code == ErrorCode::ConstraintViolation
            && (failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        {
            return SQLError::Unique(err.to_string());
        }
    }
    SQLError::Execution(err.to_string())
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self.lock()?;
        let bound = bind_params(params);

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = stmt
            .query_map(bound.as_slice(), |row| {
                let columns = column_names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| row_value_at(row, i).map(|v| (name.clone(), v)))
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(Row { columns })
            })
            .map_err(|e| SQLError::Query(e.to_string()))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| SQLError::Query(e.to_string()))
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let conn = self.lock()?;
        let bound = bind_params(params);
        let affected = conn.execute(sql, bound.as_slice()).map_err(write_error)?;
        Ok(affected as u64)
    }

    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, SQLError> {
        let conn = self.lock()?;
        let bound = bind_params(params);
        conn.execute(sql, bound.as_slice()).map_err(write_error)?;
        // Read under the same guard so no other insert can interleave.
        Ok(conn.last_insert_rowid())
    }
}

/// Copy the column at `idx` out of the row, keeping SQLite's storage class.
fn row_value_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Value> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    })
}
