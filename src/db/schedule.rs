use crate::db::db_utils::{conversion_err, date_str, get_cycle, get_date, get_opt_date};
use crate::errors::{AppError, AppResult};
use crate::models::cycle::CycleType;
use crate::models::schedule_entry::{EntryStatus, ScheduleEntry};
use chrono::{Duration, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<ScheduleEntry> {
    let status_str: String = row.get("status")?;
    let status = EntryStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_err(
            0,
            AppError::Other(format!("Invalid schedule status: {}", status_str)),
        )
    })?;

    Ok(ScheduleEntry {
        id: row.get("id")?,
        week_start: get_date(row, "week_start")?,
        equipment_id: row.get("equipment_id")?,
        cycle: get_cycle(row, "cycle")?,
        technician: row.get("technician")?,
        scheduled_date: get_date(row, "scheduled_date")?,
        status,
        completed_date: get_opt_date(row, "completed_date")?,
        duration_minutes: row.get("duration_minutes")?,
    })
}

/// Remove every entry of a week. Returns the number of rows deleted.
pub fn delete_week(conn: &Connection, week_start: NaiveDate) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM schedule_entries WHERE week_start = ?1",
        [date_str(week_start)],
    )?;
    Ok(n)
}

pub fn insert_entry(conn: &Connection, entry: &ScheduleEntry) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO schedule_entries
            (week_start, equipment_id, cycle, technician, scheduled_date, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            date_str(entry.week_start),
            entry.equipment_id,
            entry.cycle.to_db_str(),
            entry.technician,
            date_str(entry.scheduled_date),
            entry.status.to_db_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Entries of a week in generation order.
pub fn list_week(conn: &Connection, week_start: NaiveDate) -> AppResult<Vec<ScheduleEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM schedule_entries
         WHERE week_start = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([date_str(week_start)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Find a still-open entry whose week contains `date` for this equipment and
/// technician. With `cycle = None` any cycle matches.
pub fn find_open_entry(
    conn: &Connection,
    equipment_id: &str,
    technician: &str,
    date: NaiveDate,
    cycle: Option<CycleType>,
) -> AppResult<Option<ScheduleEntry>> {
    let earliest_week = date - Duration::days(6);
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM schedule_entries
         WHERE equipment_id = ?1
           AND technician = ?2 COLLATE NOCASE
           AND status = 'scheduled'
           AND week_start BETWEEN ?3 AND ?4
           AND (?5 IS NULL OR cycle = ?5)
         ORDER BY week_start DESC, id ASC
         LIMIT 1",
    )?;
    let entry = stmt
        .query_row(
            params![
                equipment_id,
                technician,
                date_str(earliest_week),
                date_str(date),
                cycle.map(|c| c.to_db_str()),
            ],
            map_row,
        )
        .optional()?;
    Ok(entry)
}

/// Scheduled → Completed. Returns the number of rows changed.
pub fn close_entry(
    conn: &Connection,
    id: i64,
    completed_date: NaiveDate,
    duration_minutes: i64,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE schedule_entries
         SET status = 'completed', completed_date = ?1, duration_minutes = ?2
         WHERE id = ?3 AND status = 'scheduled'",
        params![date_str(completed_date), duration_minutes, id],
    )?;
    Ok(n)
}

pub fn count_entries(conn: &Connection) -> AppResult<(i64, i64)> {
    Ok(conn.query_row(
        "SELECT
            COUNT(*),
            COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0)
         FROM schedule_entries",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?)
}
