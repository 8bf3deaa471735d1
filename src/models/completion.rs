use super::cycle::CycleType;
use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDate};
use serde::Serialize;

/// One completion report as submitted by a technician.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionReport {
    pub equipment_id: String,
    pub cycle: CycleType,
    pub technician: String,
    pub date: NaiveDate,
    pub hours: u32,
    pub minutes: u32,
    pub notes: String,
}

impl CompletionReport {
    pub fn new(equipment_id: &str, cycle: CycleType, technician: &str, date: NaiveDate) -> Self {
        Self {
            equipment_id: equipment_id.trim().to_string(),
            cycle,
            technician: technician.trim().to_string(),
            date,
            hours: 0,
            minutes: 0,
            notes: String::new(),
        }
    }

    /// Attach labour time. Minutes above 59 are rejected rather than carried.
    pub fn with_duration(mut self, hours: u32, minutes: u32) -> AppResult<Self> {
        if minutes > 59 {
            return Err(AppError::InvalidDuration(format!(
                "minutes must be 0-59, got {}",
                minutes
            )));
        }
        self.hours = hours;
        self.minutes = minutes;
        Ok(self)
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }

    pub fn duration_minutes(&self) -> i64 {
        i64::from(self.hours) * 60 + i64::from(self.minutes)
    }
}

/// Immutable row of the `completions` log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRecord {
    pub id: i64,
    pub equipment_id: String,
    pub cycle: CycleType,
    pub technician: String,
    pub completion_date: NaiveDate, // ⇔ completions.completion_date (TEXT "YYYY-MM-DD")
    pub duration_minutes: i64,
    pub notes: String,
    pub created_at: String, // ⇔ completions.created_at (TEXT, RFC 3339)
}

impl CompletionRecord {
    /// Build the record to insert for a report (`id` is assigned by SQLite).
    pub fn from_report(report: &CompletionReport) -> Self {
        Self {
            id: 0,
            equipment_id: report.equipment_id.clone(),
            cycle: report.cycle,
            technician: report.technician.clone(),
            completion_date: report.date,
            duration_minutes: report.duration_minutes(),
            notes: report.notes.clone(),
            created_at: Local::now().to_rfc3339(),
        }
    }
}
