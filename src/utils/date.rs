//! Date normalization: every date that enters the store goes through here.
//!
//! Catalog spreadsheets and technicians write dates as `1/5/25`, `01-05-2025`
//! or `2025-01-05`; the store only ever holds canonical `YYYY-MM-DD`.

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Canonical storage format.
pub const CANONICAL: &str = "%Y-%m-%d";

static ISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("valid ISO regex"));

static US_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})([/-])(\d{1,2})([/-])(\d{4}|\d{2})$").expect("valid M/D/Y regex")
});

/// The input did not match a known pattern or is not a real calendar date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a recognizable date: '{0}'")]
pub struct NotParseable(pub String);

/// Parse a loosely formatted date.
///
/// Accepted:
/// - `YYYY-MM-DD` (1–2 digit month/day tolerated)
/// - `M/D/YY`, `M/D/YYYY`, `M-D-YY`, `M-D-YYYY` (same separator twice)
///
/// Two-digit years below 50 are 20xx, the rest 19xx.
pub fn normalize(raw: &str) -> Result<NaiveDate, NotParseable> {
    let s = raw.trim();
    let fail = || NotParseable(raw.to_string());

    if let Some(c) = ISO_RE.captures(s) {
        let y: i32 = c[1].parse().map_err(|_| fail())?;
        let m: u32 = c[2].parse().map_err(|_| fail())?;
        let d: u32 = c[3].parse().map_err(|_| fail())?;
        return NaiveDate::from_ymd_opt(y, m, d).ok_or_else(fail);
    }

    if let Some(c) = US_RE.captures(s) {
        if c[2] != c[4] {
            return Err(fail());
        }
        let m: u32 = c[1].parse().map_err(|_| fail())?;
        let d: u32 = c[3].parse().map_err(|_| fail())?;
        let year_str = &c[5];
        let mut y: i32 = year_str.parse().map_err(|_| fail())?;
        if year_str.len() == 2 {
            y += if y < 50 { 2000 } else { 1900 };
        }
        return NaiveDate::from_ymd_opt(y, m, d).ok_or_else(fail);
    }

    Err(fail())
}

/// Like [`normalize`], but absent, blank and unparseable input all become
/// `None`, which callers read as "never done".
pub fn normalize_lenient(raw: Option<&str>) -> Option<NaiveDate> {
    raw.filter(|s| !s.trim().is_empty())
        .and_then(|s| normalize(s).ok())
}

pub fn to_canonical(date: NaiveDate) -> String {
    date.format(CANONICAL).to_string()
}

/// Strict parse of a stored value (the store only holds canonical dates).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, CANONICAL).ok()
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Monday of the ISO week containing `date`.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// True when `date` falls in the 7-day window starting at `week_start`.
pub fn in_week(date: NaiveDate, week_start: NaiveDate) -> bool {
    date >= week_start && date < week_start + Duration::days(7)
}
