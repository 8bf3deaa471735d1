use crate::db::db_utils::{
    conversion_err, cycle_columns, date_str, get_flag, get_opt_date, opt_date_str,
};
use crate::errors::{AppError, AppResult};
use crate::models::cycle::CycleType;
use crate::models::equipment::{CycleDates, Equipment};
use crate::models::equipment_status::EquipmentStatus;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const SELECT_EQUIPMENT: &str = "SELECT * FROM equipment";

pub fn map_row(row: &Row) -> Result<Equipment> {
    let status_str: String = row.get("status")?;
    let status = EquipmentStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_err(0, AppError::InvalidStatus(status_str.clone())))?;

    Ok(Equipment {
        id: row.get("id")?,
        description: row.get("description")?,
        location: row.get("location")?,
        monthly: CycleDates {
            enabled: get_flag(row, "monthly_enabled")?,
            last: get_opt_date(row, "last_monthly")?,
            next: get_opt_date(row, "next_monthly")?,
        },
        six_month: CycleDates {
            enabled: get_flag(row, "six_month_enabled")?,
            last: get_opt_date(row, "last_six_month")?,
            next: get_opt_date(row, "next_six_month")?,
        },
        annual: CycleDates {
            enabled: get_flag(row, "annual_enabled")?,
            last: get_opt_date(row, "last_annual")?,
            next: get_opt_date(row, "next_annual")?,
        },
        status,
    })
}

pub fn exists(conn: &Connection, id: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM equipment WHERE id = ?1")?;
    Ok(stmt.exists([id])?)
}

pub fn get_equipment(conn: &Connection, id: &str) -> AppResult<Option<Equipment>> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_EQUIPMENT} WHERE id = ?1"))?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

/// All equipment, ordered by id.
pub fn list_equipment(conn: &Connection) -> AppResult<Vec<Equipment>> {
    query_list(conn, &format!("{SELECT_EQUIPMENT} ORDER BY id ASC"))
}

/// Active equipment only, ordered by id.
pub fn list_active_equipment(conn: &Connection) -> AppResult<Vec<Equipment>> {
    query_list(
        conn,
        &format!("{SELECT_EQUIPMENT} WHERE status = 'active' ORDER BY id ASC"),
    )
}

fn query_list(conn: &Connection, sql: &str) -> AppResult<Vec<Equipment>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert a new equipment row. Fails if the id is taken.
pub fn insert_equipment(conn: &Connection, eq: &Equipment) -> AppResult<()> {
    if exists(conn, &eq.id)? {
        return Err(AppError::DuplicateEquipment(eq.id.clone()));
    }
    let now = Local::now().to_rfc3339();
    conn.execute(
        "INSERT INTO equipment (
            id, description, location,
            monthly_enabled, six_month_enabled, annual_enabled,
            last_monthly, next_monthly, last_six_month, next_six_month, last_annual, next_annual,
            status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14)",
        params![
            eq.id,
            eq.description,
            eq.location,
            eq.monthly.enabled,
            eq.six_month.enabled,
            eq.annual.enabled,
            opt_date_str(eq.monthly.last),
            opt_date_str(eq.monthly.next),
            opt_date_str(eq.six_month.last),
            opt_date_str(eq.six_month.next),
            opt_date_str(eq.annual.last),
            opt_date_str(eq.annual.next),
            eq.status.to_db_str(),
            now,
        ],
    )?;
    Ok(())
}

/// Insert a new catalog row, or refresh description and location of an
/// existing one. Returns `true` when the row is new.
///
/// PM dates, cycle flags and status of an existing row are left alone: dates
/// move only through completions, flags and status through manual edits.
pub fn upsert_equipment(conn: &Connection, eq: &Equipment) -> AppResult<bool> {
    if !exists(conn, &eq.id)? {
        insert_equipment(conn, eq)?;
        return Ok(true);
    }

    conn.execute(
        "UPDATE equipment
         SET description = ?2, location = ?3, updated_at = ?4
         WHERE id = ?1",
        params![eq.id, eq.description, eq.location, Local::now().to_rfc3339()],
    )?;
    Ok(false)
}

/// Set `last_<cycle>` / `next_<cycle>`; the other cycles' columns are untouched.
/// Returns the number of rows changed (0 or 1).
pub fn update_cycle_dates(
    conn: &Connection,
    id: &str,
    cycle: CycleType,
    last: NaiveDate,
    next: NaiveDate,
) -> AppResult<usize> {
    let (_, last_col, next_col) =
        cycle_columns(cycle).ok_or_else(|| AppError::InvalidCycle(cycle.label().to_string()))?;

    let sql = format!(
        "UPDATE equipment SET {last_col} = ?1, {next_col} = ?2, updated_at = ?3 WHERE id = ?4"
    );
    let n = conn.execute(
        &sql,
        params![
            date_str(last),
            date_str(next),
            Local::now().to_rfc3339(),
            id
        ],
    )?;
    Ok(n)
}

pub fn update_status(conn: &Connection, id: &str, status: EquipmentStatus) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE equipment SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.to_db_str(), Local::now().to_rfc3339(), id],
    )?;
    Ok(n)
}

pub fn update_flags(
    conn: &Connection,
    id: &str,
    monthly: bool,
    six_month: bool,
    annual: bool,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE equipment
         SET monthly_enabled = ?1, six_month_enabled = ?2, annual_enabled = ?3, updated_at = ?4
         WHERE id = ?5",
        params![monthly, six_month, annual, Local::now().to_rfc3339(), id],
    )?;
    Ok(n)
}

/// Count equipment per status (for `db --info`).
pub fn count_by_status(conn: &Connection) -> AppResult<Vec<(EquipmentStatus, i64)>> {
    let mut stmt =
        conn.prepare("SELECT status, COUNT(*) FROM equipment GROUP BY status ORDER BY status")?;
    let rows = stmt.query_map([], |row| {
        let s: String = row.get(0)?;
        let status = EquipmentStatus::from_db_str(&s)
            .ok_or_else(|| conversion_err(0, AppError::InvalidStatus(s.clone())))?;
        Ok((status, row.get::<_, i64>(1)?))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
