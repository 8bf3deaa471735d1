//! Formatting utilities used for CLI outputs.

use crate::models::due::DueStatus;
use chrono::NaiveDate;

/// Minutes as `01h 30m`.
pub fn mins2readable(mins: i64) -> String {
    let m = mins.abs();
    let sign = if mins < 0 { "-" } else { "" };
    format!("{}{:02}h {:02}m", sign, m / 60, m % 60)
}

pub fn opt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "--".to_string())
}

/// `in 12d`, `today`, `5d late`, or `never`.
pub fn describe_delta(status: &DueStatus) -> String {
    match status.days_delta {
        None => "never".to_string(),
        Some(0) => "today".to_string(),
        Some(d) if d > 0 => format!("in {}d", d),
        Some(d) => format!("{}d late", -d),
    }
}
