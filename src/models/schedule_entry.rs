use super::cycle::CycleType;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryStatus {
    Scheduled,
    Completed,
}

impl EntryStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EntryStatus::Scheduled => "scheduled",
            EntryStatus::Completed => "completed",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(EntryStatus::Scheduled),
            "completed" => Some(EntryStatus::Completed),
            _ => None,
        }
    }
}

/// One planned, technician-assigned unit of PM work.
/// Keyed by (week_start, equipment_id, cycle).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub id: i64,
    pub week_start: NaiveDate,
    pub equipment_id: String,
    pub cycle: CycleType,
    pub technician: String,
    pub scheduled_date: NaiveDate,
    pub status: EntryStatus,
    pub completed_date: Option<NaiveDate>,
    pub duration_minutes: Option<i64>,
}
