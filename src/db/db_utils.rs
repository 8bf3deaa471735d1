//! Row <-> domain conversion helpers shared by the query modules.

use crate::errors::AppError;
use crate::models::cycle::CycleType;
use crate::utils::date;
use chrono::NaiveDate;
use rusqlite::Row;
use rusqlite::types::Type;

/// Wrap a domain parse failure as a rusqlite conversion error.
pub fn conversion_err(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Required canonical date column.
pub fn get_date(row: &Row, col: &str) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(col)?;
    date::parse_date(&raw).ok_or_else(|| conversion_err(0, AppError::InvalidDate(raw)))
}

/// Optional date column. Values that do not normalize read as absent.
pub fn get_opt_date(row: &Row, col: &str) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(col)?;
    Ok(date::normalize_lenient(raw.as_deref()))
}

pub fn get_cycle(row: &Row, col: &str) -> rusqlite::Result<CycleType> {
    let raw: String = row.get(col)?;
    CycleType::from_db_str(&raw).ok_or_else(|| conversion_err(0, AppError::InvalidCycle(raw)))
}

pub fn get_flag(row: &Row, col: &str) -> rusqlite::Result<bool> {
    Ok(row.get::<_, i64>(col)? != 0)
}

pub fn date_str(d: NaiveDate) -> String {
    date::to_canonical(d)
}

pub fn opt_date_str(d: Option<NaiveDate>) -> Option<String> {
    d.map(date::to_canonical)
}

/// (enabled, last, next) column names of a normal cycle.
pub fn cycle_columns(cycle: CycleType) -> Option<(&'static str, &'static str, &'static str)> {
    match cycle {
        CycleType::Monthly => Some(("monthly_enabled", "last_monthly", "next_monthly")),
        CycleType::SixMonth => Some(("six_month_enabled", "last_six_month", "next_six_month")),
        CycleType::Annual => Some(("annual_enabled", "last_annual", "next_annual")),
        CycleType::CannotFind | CycleType::RunToFailure => None,
    }
}
