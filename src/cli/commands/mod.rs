pub mod add;
pub mod check;
pub mod complete;
pub mod config;
pub mod db;
pub mod due;
pub mod edit;
pub mod history;
pub mod import;
pub mod init;
pub mod log;
pub mod schedule;
pub mod show;

use crate::errors::{AppError, AppResult};
use crate::models::cycle::CycleType;
use crate::utils::date;
use chrono::NaiveDate;

/// Date argument in any accepted layout.
pub(crate) fn date_arg(raw: &str) -> AppResult<NaiveDate> {
    date::normalize(raw).map_err(|e| AppError::InvalidDate(e.0))
}

/// Optional date argument; `None` means today.
pub(crate) fn date_or_today(raw: &Option<String>) -> AppResult<NaiveDate> {
    match raw {
        Some(s) => date_arg(s),
        None => Ok(date::today()),
    }
}

pub(crate) fn cycle_arg(raw: &str) -> AppResult<CycleType> {
    CycleType::parse(raw).ok_or_else(|| AppError::InvalidCycle(raw.to_string()))
}
