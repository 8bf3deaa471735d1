use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Open the store at `path` and bring its schema up to date.
///
/// Every command that touches equipment, completions or schedules goes
/// through here, so an old database file is migrated on first use.
pub fn open_db(path: &str) -> AppResult<DbPool> {
    let pool = DbPool::new(path)?;
    run_pending_migrations(&pool.conn)?;
    Ok(pool)
}

/// In-memory store with the full schema (unit tests).
pub fn open_memory_db() -> AppResult<DbPool> {
    let pool = DbPool::in_memory()?;
    run_pending_migrations(&pool.conn)?;
    Ok(pool)
}
