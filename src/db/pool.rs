//! SQLite store handle.
//!
//! One `DbPool` owns the single connection. Every mutating engine operation
//! takes `&mut DbPool`, so at most one of them can run at a time.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, Transaction};
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> rusqlite::Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Private in-memory store, used by unit tests.
    pub fn in_memory() -> rusqlite::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Run `func` inside one transaction.
    ///
    /// `Ok((value, true))` commits and `Ok((value, false))` rolls back; an
    /// error from `func` rolls back and is returned unchanged. A failing
    /// COMMIT is reported as [`AppError::TransactionFailed`].
    pub fn transaction<F, T>(&mut self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> AppResult<(T, bool)>,
    {
        let tx = self.conn.transaction()?;
        let (value, commit) = func(&tx)?;
        if commit {
            tx.commit().map_err(AppError::TransactionFailed)?;
        } else {
            tx.rollback()?;
        }
        Ok(value)
    }
}
