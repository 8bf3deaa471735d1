use crate::db::db_utils::{date_str, get_cycle, get_date};
use crate::errors::AppResult;
use crate::models::completion::CompletionRecord;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<CompletionRecord> {
    Ok(CompletionRecord {
        id: row.get("id")?,
        equipment_id: row.get("equipment_id")?,
        cycle: get_cycle(row, "cycle")?,
        technician: row.get("technician")?,
        completion_date: get_date(row, "completion_date")?,
        duration_minutes: row.get("duration_minutes")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
    })
}

/// Append one record; returns its new id.
pub fn insert_completion(conn: &Connection, rec: &CompletionRecord) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO completions
            (equipment_id, cycle, technician, completion_date, duration_minutes, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            rec.equipment_id,
            rec.cycle.to_db_str(),
            rec.technician,
            date_str(rec.completion_date),
            rec.duration_minutes,
            rec.notes,
            rec.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_completion(conn: &Connection, id: i64) -> AppResult<Option<CompletionRecord>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM completions WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

/// Every record of one equipment, newest first.
pub fn completions_for_equipment(
    conn: &Connection,
    equipment_id: &str,
) -> AppResult<Vec<CompletionRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM completions
         WHERE equipment_id = ?1
         ORDER BY completion_date DESC, id DESC",
    )?;
    let rows = stmt.query_map([equipment_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Records of one equipment dated within `[from, to]`, newest first.
pub fn completions_between(
    conn: &Connection,
    equipment_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<CompletionRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM completions
         WHERE equipment_id = ?1 AND completion_date BETWEEN ?2 AND ?3
         ORDER BY completion_date DESC, id DESC",
    )?;
    let rows = stmt.query_map(
        params![equipment_id, date_str(from), date_str(to)],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Full history, newest first, optionally limited.
pub fn list_completions(conn: &Connection, limit: Option<usize>) -> AppResult<Vec<CompletionRecord>> {
    let limit = limit.map(|l| l as i64).unwrap_or(-1);
    let mut stmt = conn.prepare(
        "SELECT * FROM completions
         ORDER BY completion_date DESC, id DESC
         LIMIT ?1",
    )?;
    let rows = stmt.query_map([limit], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_completions(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM completions", [], |row| row.get(0))?)
}
