use crate::db::{completions, equipment};
use crate::errors::AppResult;
use crate::models::completion::{CompletionRecord, CompletionReport};
use crate::models::cycle::CycleType;
use crate::models::equipment_status::EquipmentStatus;
use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;
use std::fmt;

/// Same technician on the same equipment inside this many days is suspicious.
pub const SAME_TECH_WINDOW_DAYS: i64 = 7;
/// Annual PM this close to a Monthly one on the same equipment.
pub const ANNUAL_AFTER_MONTHLY_DAYS: i64 = 7;
/// Monthly PM this close to an Annual one on the same equipment.
pub const MONTHLY_AFTER_ANNUAL_DAYS: i64 = 30;

/// Why a completion report looks wrong. Only `UnknownEquipment` is a hard
/// rejection; the rest are advisory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConflictReason {
    UnknownEquipment {
        equipment_id: String,
    },
    MinimumInterval {
        cycle: CycleType,
        previous_date: NaiveDate,
        previous_technician: String,
        days_apart: i64,
        min_days: i64,
    },
    SameTechnicianRecent {
        technician: String,
        previous_date: NaiveDate,
        previous_cycle: CycleType,
    },
    AnnualNearMonthly {
        monthly_date: NaiveDate,
        days_apart: i64,
    },
    MonthlyNearAnnual {
        annual_date: NaiveDate,
        days_apart: i64,
    },
    InactiveEquipment {
        status: EquipmentStatus,
        cycle: CycleType,
    },
}

impl ConflictReason {
    pub fn is_hard(&self) -> bool {
        matches!(self, ConflictReason::UnknownEquipment { .. })
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::UnknownEquipment { equipment_id } => {
                write!(f, "equipment '{}' does not exist", equipment_id)
            }
            ConflictReason::MinimumInterval {
                cycle,
                previous_date,
                previous_technician,
                days_apart,
                min_days,
            } => write!(
                f,
                "{} PM already completed on {} by {} ({} days apart, minimum {})",
                cycle, previous_date, previous_technician, days_apart, min_days
            ),
            ConflictReason::SameTechnicianRecent {
                technician,
                previous_date,
                previous_cycle,
            } => write!(
                f,
                "{} already logged a {} completion on this equipment on {}",
                technician, previous_cycle, previous_date
            ),
            ConflictReason::AnnualNearMonthly {
                monthly_date,
                days_apart,
            } => write!(
                f,
                "Annual PM submitted {} days from a Monthly completion on {}",
                days_apart, monthly_date
            ),
            ConflictReason::MonthlyNearAnnual {
                annual_date,
                days_apart,
            } => write!(
                f,
                "Monthly PM submitted {} days from an Annual completion on {}",
                days_apart, annual_date
            ),
            ConflictReason::InactiveEquipment { status, cycle } => write!(
                f,
                "equipment is marked '{}' but a {} PM was submitted",
                status, cycle
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// No reasons at all.
    pub ok: bool,
    /// A hard rejection is present; the report must not be applied.
    pub rejected: bool,
    pub reasons: Vec<ConflictReason>,
}

impl ValidationReport {
    fn from_reasons(reasons: Vec<ConflictReason>) -> Self {
        Self {
            ok: reasons.is_empty(),
            rejected: reasons.iter().any(ConflictReason::is_hard),
            reasons,
        }
    }
}

pub struct ConflictValidator;

impl ConflictValidator {
    /// Check a completion report against the store. Read-only.
    pub fn validate(conn: &Connection, report: &CompletionReport) -> AppResult<ValidationReport> {
        let Some(eq) = equipment::get_equipment(conn, &report.equipment_id)? else {
            return Ok(ValidationReport::from_reasons(vec![
                ConflictReason::UnknownEquipment {
                    equipment_id: report.equipment_id.clone(),
                },
            ]));
        };

        let window = CycleType::NORMAL
            .iter()
            .filter_map(|c| c.min_interval_days())
            .max()
            .unwrap_or(0)
            .max(MONTHLY_AFTER_ANNUAL_DAYS);

        let nearby = completions::completions_between(
            conn,
            &eq.id,
            report.date - Duration::days(window),
            report.date + Duration::days(window),
        )?;

        let mut reasons = Vec::new();
        reasons.extend(check_min_interval(report, &nearby));
        reasons.extend(check_same_technician(report, &nearby));
        reasons.extend(check_cross_cycle(report, &nearby));

        if eq.status != EquipmentStatus::Active && report.cycle.is_normal() {
            reasons.push(ConflictReason::InactiveEquipment {
                status: eq.status,
                cycle: report.cycle,
            });
        }

        Ok(ValidationReport::from_reasons(reasons))
    }
}

fn days_apart(a: NaiveDate, b: NaiveDate) -> i64 {
    (a - b).num_days().abs()
}

fn check_min_interval(report: &CompletionReport, nearby: &[CompletionRecord]) -> Vec<ConflictReason> {
    let Some(min_days) = report.cycle.min_interval_days() else {
        return Vec::new();
    };

    nearby
        .iter()
        .filter(|rec| rec.cycle == report.cycle)
        .filter_map(|rec| {
            let apart = days_apart(report.date, rec.completion_date);
            (apart < min_days).then(|| ConflictReason::MinimumInterval {
                cycle: report.cycle,
                previous_date: rec.completion_date,
                previous_technician: rec.technician.clone(),
                days_apart: apart,
                min_days,
            })
        })
        .collect()
}

fn check_same_technician(
    report: &CompletionReport,
    nearby: &[CompletionRecord],
) -> Vec<ConflictReason> {
    nearby
        .iter()
        .filter(|rec| rec.technician.eq_ignore_ascii_case(&report.technician))
        .filter(|rec| {
            let back = (report.date - rec.completion_date).num_days();
            (0..=SAME_TECH_WINDOW_DAYS).contains(&back)
        })
        .map(|rec| ConflictReason::SameTechnicianRecent {
            technician: rec.technician.clone(),
            previous_date: rec.completion_date,
            previous_cycle: rec.cycle,
        })
        .collect()
}

fn check_cross_cycle(report: &CompletionReport, nearby: &[CompletionRecord]) -> Vec<ConflictReason> {
    let (other, limit) = match report.cycle {
        CycleType::Annual => (CycleType::Monthly, ANNUAL_AFTER_MONTHLY_DAYS),
        CycleType::Monthly => (CycleType::Annual, MONTHLY_AFTER_ANNUAL_DAYS),
        _ => return Vec::new(),
    };

    nearby
        .iter()
        .filter(|rec| rec.cycle == other)
        .filter_map(|rec| {
            let apart = days_apart(report.date, rec.completion_date);
            if apart > limit {
                return None;
            }
            Some(match report.cycle {
                CycleType::Annual => ConflictReason::AnnualNearMonthly {
                    monthly_date: rec.completion_date,
                    days_apart: apart,
                },
                _ => ConflictReason::MonthlyNearAnnual {
                    annual_date: rec.completion_date,
                    days_apart: apart,
                },
            })
        })
        .collect()
}
