use crate::core::calculator::offset::annual_offset;
use crate::core::validator::{ConflictReason, ConflictValidator, ValidationReport};
use crate::db::pool::DbPool;
use crate::db::{completions, equipment, log, schedule};
use crate::errors::{AppError, AppResult};
use crate::models::completion::{CompletionRecord, CompletionReport};
use crate::models::cycle::CycleType;
use crate::models::equipment_status::EquipmentStatus;
use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

/// What to do when the validator raised only soft flags.
/// The caller decides; flags are never overridden implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagPolicy {
    Abort,
    Proceed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CompletionOutcome {
    /// Written and committed (and verified, when requested).
    Completed {
        completion_id: i64,
        schedule_closed: bool,
        /// Soft flags the caller chose to accept.
        flags: Vec<ConflictReason>,
    },
    /// Soft flags with `FlagPolicy::Abort`; nothing written.
    Flagged(ValidationReport),
    /// Hard rejection; nothing written.
    Rejected(ValidationReport),
    /// Committed, but reading it back disagrees. Needs a human, not a retry.
    VerificationMismatch { completion_id: i64, detail: String },
}

/// Next due date after completing `cycle` on `date`.
/// Annual due dates carry the equipment's fixed offset.
pub fn next_due(equipment_id: &str, cycle: CycleType, date: NaiveDate) -> Option<NaiveDate> {
    let mut days = cycle.length_days()?;
    if cycle == CycleType::Annual {
        days += annual_offset(equipment_id);
    }
    Some(date + Duration::days(days))
}

pub struct CompletionLogic;

impl CompletionLogic {
    /// Validate and apply one completion report as a single transaction.
    pub fn complete(
        pool: &mut DbPool,
        report: &CompletionReport,
        policy: FlagPolicy,
        verify: bool,
    ) -> AppResult<CompletionOutcome> {
        let outcome = pool
            .transaction(|tx| {
                let validation = ConflictValidator::validate(tx, report)?;

                if validation.rejected {
                    return Ok((CompletionOutcome::Rejected(validation), false));
                }
                if !validation.ok && policy == FlagPolicy::Abort {
                    return Ok((CompletionOutcome::Flagged(validation), false));
                }

                let completion_id = apply(tx, report)?;
                let schedule_closed = close_schedule_entry(tx, report)?;

                log::pmlog(
                    tx,
                    "complete",
                    &report.equipment_id,
                    &format!(
                        "{} by {} on {} (#{}{}{})",
                        report.cycle,
                        report.technician,
                        report.date,
                        completion_id,
                        if schedule_closed { ", schedule closed" } else { "" },
                        if validation.ok { "" } else { ", flags accepted" },
                    ),
                )?;

                Ok((
                    CompletionOutcome::Completed {
                        completion_id,
                        schedule_closed,
                        flags: validation.reasons,
                    },
                    true,
                ))
            })
            .map_err(|e| match e {
                AppError::Db(inner) => AppError::TransactionFailed(inner),
                other => other,
            })?;

        if let CompletionOutcome::Completed { completion_id, .. } = &outcome
            && verify
            && let Some(detail) = read_back(&pool.conn, *completion_id, report)?
        {
            log::pmlog(&pool.conn, "verify_mismatch", &report.equipment_id, &detail)?;
            return Ok(CompletionOutcome::VerificationMismatch {
                completion_id: *completion_id,
                detail,
            });
        }

        Ok(outcome)
    }
}

/// Write the completion record and the equipment side effects of its cycle.
fn apply(conn: &Connection, report: &CompletionReport) -> AppResult<i64> {
    let completion_id =
        completions::insert_completion(conn, &CompletionRecord::from_report(report))?;
    let id = report.equipment_id.as_str();

    let changed = match report.cycle {
        CycleType::Monthly | CycleType::SixMonth | CycleType::Annual => {
            let next = next_due(id, report.cycle, report.date)
                .ok_or_else(|| AppError::InvalidCycle(report.cycle.label().to_string()))?;
            equipment::update_cycle_dates(conn, id, report.cycle, report.date, next)?
        }
        CycleType::CannotFind => equipment::update_status(conn, id, EquipmentStatus::Missing)?,
        CycleType::RunToFailure => {
            equipment::update_flags(conn, id, false, false, false)?;
            equipment::update_status(conn, id, EquipmentStatus::RunToFailure)?
        }
    };

    if changed == 0 {
        return Err(AppError::UnknownEquipment(id.to_string()));
    }
    Ok(completion_id)
}

/// Close the matching open entry of the completion's week, if any.
/// Pseudo-cycles close whatever cycle was planned for that equipment.
fn close_schedule_entry(conn: &Connection, report: &CompletionReport) -> AppResult<bool> {
    let cycle = report.cycle.is_normal().then_some(report.cycle);
    let Some(entry) = schedule::find_open_entry(
        conn,
        &report.equipment_id,
        &report.technician,
        report.date,
        cycle,
    )?
    else {
        return Ok(false);
    };

    let n = schedule::close_entry(conn, entry.id, report.date, report.duration_minutes())?;
    Ok(n == 1)
}

/// Re-read what was committed. `Some(detail)` describes the first disagreement.
fn read_back(conn: &Connection, completion_id: i64, report: &CompletionReport) -> AppResult<Option<String>> {
    let Some(rec) = completions::get_completion(conn, completion_id)? else {
        return Ok(Some(format!("completion #{} not found", completion_id)));
    };
    if rec.equipment_id != report.equipment_id
        || rec.cycle != report.cycle
        || rec.completion_date != report.date
        || rec.technician != report.technician
    {
        return Ok(Some(format!(
            "completion #{} reads back as {} {} on {} by {}",
            completion_id, rec.equipment_id, rec.cycle, rec.completion_date, rec.technician
        )));
    }

    let Some(eq) = equipment::get_equipment(conn, &report.equipment_id)? else {
        return Ok(Some(format!(
            "equipment '{}' not found after commit",
            report.equipment_id
        )));
    };

    let detail = match report.cycle {
        CycleType::Monthly | CycleType::SixMonth | CycleType::Annual => {
            let expected_next = next_due(&eq.id, report.cycle, report.date);
            match eq.cycle(report.cycle) {
                Some(d) if d.last == Some(report.date) && d.next == expected_next => None,
                Some(d) => Some(format!(
                    "{} dates read back as last={:?} next={:?}, expected last={} next={:?}",
                    report.cycle, d.last, d.next, report.date, expected_next
                )),
                None => Some(format!("{} has no date columns", report.cycle)),
            }
        }
        CycleType::CannotFind => (eq.status != EquipmentStatus::Missing)
            .then(|| format!("status reads back as '{}', expected 'Missing'", eq.status)),
        CycleType::RunToFailure => {
            let flags_cleared = !eq.monthly.enabled && !eq.six_month.enabled && !eq.annual.enabled;
            (eq.status != EquipmentStatus::RunToFailure || !flags_cleared).then(|| {
                format!(
                    "status '{}' / cycle flags {}/{}/{} after Run to Failure",
                    eq.status, eq.monthly.enabled, eq.six_month.enabled, eq.annual.enabled
                )
            })
        }
    };
    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::weekly::{GenerateRequest, WeeklyPlanner};
    use crate::db::initialize::open_memory_db;
    use crate::models::equipment::Equipment;
    use crate::models::schedule_entry::EntryStatus;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row_counts(conn: &Connection) -> (i64, i64, String) {
        let c = completions::count_completions(conn).unwrap();
        let (s, _) = schedule::count_entries(conn).unwrap();
        let eq: String = conn
            .query_row(
                "SELECT group_concat(id || status || IFNULL(last_monthly,'') || IFNULL(next_annual,''), ';') FROM equipment",
                [],
                |r| r.get::<_, Option<String>>(0),
            )
            .unwrap()
            .unwrap_or_default();
        (c, s, eq)
    }

    fn seed_e0100(pool: &DbPool) {
        let mut eq = Equipment::new("E-0100");
        eq.monthly.last = Some(ymd(2025, 1, 1));
        eq.monthly.next = Some(ymd(2025, 1, 31));
        eq.annual.last = Some(ymd(2024, 6, 1));
        eq.annual.next = next_due("E-0100", CycleType::Annual, ymd(2024, 6, 1));
        equipment::insert_equipment(&pool.conn, &eq).unwrap();
    }

    #[test]
    fn monthly_completion_leaves_annual_alone() {
        let mut pool = open_memory_db().unwrap();
        seed_e0100(&pool);
        let before = equipment::get_equipment(&pool.conn, "E-0100").unwrap().unwrap();

        let report = CompletionReport::new("E-0100", CycleType::Monthly, "Ann", ymd(2025, 2, 1));
        let out = CompletionLogic::complete(&mut pool, &report, FlagPolicy::Abort, true).unwrap();
        assert!(matches!(out, CompletionOutcome::Completed { .. }), "{out:?}");

        let after = equipment::get_equipment(&pool.conn, "E-0100").unwrap().unwrap();
        assert_eq!(after.monthly.last, Some(ymd(2025, 2, 1)));
        assert_eq!(after.monthly.next, Some(ymd(2025, 3, 3)));
        assert_eq!(after.annual, before.annual);
        assert_eq!(after.six_month, before.six_month);
    }

    #[test]
    fn annual_completion_applies_offset_and_leaves_monthly_alone() {
        let mut pool = open_memory_db().unwrap();
        seed_e0100(&pool);
        let before = equipment::get_equipment(&pool.conn, "E-0100").unwrap().unwrap();

        let report = CompletionReport::new("E-0100", CycleType::Annual, "Bob", ymd(2025, 6, 2));
        let out = CompletionLogic::complete(&mut pool, &report, FlagPolicy::Abort, true).unwrap();
        assert!(matches!(out, CompletionOutcome::Completed { .. }), "{out:?}");

        let after = equipment::get_equipment(&pool.conn, "E-0100").unwrap().unwrap();
        let offset = annual_offset("E-0100");
        assert_eq!(after.annual.last, Some(ymd(2025, 6, 2)));
        assert_eq!(
            after.annual.next,
            Some(ymd(2025, 6, 2) + Duration::days(365 + offset))
        );
        assert_eq!(after.monthly, before.monthly);
    }

    #[test]
    fn unknown_equipment_changes_nothing() {
        let mut pool = open_memory_db().unwrap();
        seed_e0100(&pool);
        let before = row_counts(&pool.conn);

        let report = CompletionReport::new("GHOST-1", CycleType::Monthly, "Ann", ymd(2025, 2, 1));
        let out = CompletionLogic::complete(&mut pool, &report, FlagPolicy::Proceed, true).unwrap();

        assert!(matches!(out, CompletionOutcome::Rejected(ref v) if v.rejected));
        assert_eq!(row_counts(&pool.conn), before);
    }

    #[test]
    fn flagged_report_is_not_written_unless_caller_proceeds() {
        let mut pool = open_memory_db().unwrap();
        seed_e0100(&pool);
        let first = CompletionReport::new("E-0100", CycleType::Monthly, "Ann", ymd(2025, 2, 1));
        CompletionLogic::complete(&mut pool, &first, FlagPolicy::Abort, true).unwrap();
        let before = row_counts(&pool.conn);

        let dup = CompletionReport::new("E-0100", CycleType::Monthly, "Bob", ymd(2025, 2, 10));
        let out = CompletionLogic::complete(&mut pool, &dup, FlagPolicy::Abort, true).unwrap();
        assert!(matches!(out, CompletionOutcome::Flagged(ref v) if !v.ok && !v.rejected));
        assert_eq!(row_counts(&pool.conn), before);

        let out = CompletionLogic::complete(&mut pool, &dup, FlagPolicy::Proceed, true).unwrap();
        match out {
            CompletionOutcome::Completed { flags, .. } => assert!(!flags.is_empty()),
            other => panic!("expected completion, got {other:?}"),
        }
        assert_eq!(completions::count_completions(&pool.conn).unwrap(), 2);
    }

    #[test]
    fn cannot_find_marks_missing_without_touching_dates() {
        let mut pool = open_memory_db().unwrap();
        seed_e0100(&pool);
        let before = equipment::get_equipment(&pool.conn, "E-0100").unwrap().unwrap();

        let report = CompletionReport::new("E-0100", CycleType::CannotFind, "Ann", ymd(2025, 2, 1));
        let out = CompletionLogic::complete(&mut pool, &report, FlagPolicy::Abort, true).unwrap();
        assert!(matches!(out, CompletionOutcome::Completed { .. }), "{out:?}");

        let after = equipment::get_equipment(&pool.conn, "E-0100").unwrap().unwrap();
        assert_eq!(after.status, EquipmentStatus::Missing);
        assert_eq!(after.monthly, before.monthly);
        assert_eq!(after.annual, before.annual);
    }

    #[test]
    fn run_to_failure_disables_cycles_and_leaves_future_schedules() {
        let mut pool = open_memory_db().unwrap();
        seed_e0100(&pool);
        equipment::insert_equipment(&pool.conn, &Equipment::new("E-0200")).unwrap();

        let report =
            CompletionReport::new("E-0100", CycleType::RunToFailure, "Ann", ymd(2025, 2, 1));
        let out = CompletionLogic::complete(&mut pool, &report, FlagPolicy::Abort, true).unwrap();
        assert!(matches!(out, CompletionOutcome::Completed { .. }), "{out:?}");

        let eq = equipment::get_equipment(&pool.conn, "E-0100").unwrap().unwrap();
        assert_eq!(eq.status, EquipmentStatus::RunToFailure);
        assert!(!eq.monthly.enabled && !eq.six_month.enabled && !eq.annual.enabled);

        let req = GenerateRequest {
            week_start: ymd(2025, 3, 3),
            technicians: vec!["Ann".into(), "Bob".into()],
            weekly_target: 110,
            today: ymd(2025, 3, 3),
        };
        let entries = WeeklyPlanner::generate(&mut pool, &req).unwrap();
        assert!(entries.iter().all(|e| e.equipment_id != "E-0100"));
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn completion_closes_the_matching_schedule_entry() {
        let mut pool = open_memory_db().unwrap();
        equipment::insert_equipment(&pool.conn, &Equipment::new("E-0300")).unwrap();
        let week = ymd(2025, 3, 3);
        let req = GenerateRequest {
            week_start: week,
            technicians: vec!["Ann".into()],
            weekly_target: 110,
            today: week,
        };
        let planned = WeeklyPlanner::generate(&mut pool, &req).unwrap();
        assert_eq!(planned[0].cycle, CycleType::Monthly);

        let report = CompletionReport::new("E-0300", CycleType::Monthly, "Ann", ymd(2025, 3, 5))
            .with_duration(1, 30)
            .unwrap();
        let out = CompletionLogic::complete(&mut pool, &report, FlagPolicy::Abort, true).unwrap();
        assert!(matches!(
            out,
            CompletionOutcome::Completed {
                schedule_closed: true,
                ..
            }
        ));

        let entries = schedule::list_week(&pool.conn, week).unwrap();
        assert_eq!(entries[0].status, EntryStatus::Completed);
        assert_eq!(entries[0].completed_date, Some(ymd(2025, 3, 5)));
        assert_eq!(entries[0].duration_minutes, Some(90));

        // Ad-hoc completion next week: no entry to close, still fine.
        let adhoc = CompletionReport::new("E-0300", CycleType::SixMonth, "Bob", ymd(2025, 3, 12));
        let out = CompletionLogic::complete(&mut pool, &adhoc, FlagPolicy::Abort, true).unwrap();
        assert!(matches!(
            out,
            CompletionOutcome::Completed {
                schedule_closed: false,
                ..
            }
        ));
    }

    #[test]
    fn technician_name_case_does_not_block_closing() {
        let mut pool = open_memory_db().unwrap();
        equipment::insert_equipment(&pool.conn, &Equipment::new("E-1")).unwrap();
        let week = ymd(2025, 3, 3);
        let req = GenerateRequest {
            week_start: week,
            technicians: vec!["Ann".into()],
            weekly_target: 110,
            today: week,
        };
        WeeklyPlanner::generate(&mut pool, &req).unwrap();

        let report = CompletionReport::new("E-1", CycleType::Monthly, "ann", ymd(2025, 3, 4));
        let out = CompletionLogic::complete(&mut pool, &report, FlagPolicy::Abort, true).unwrap();
        assert!(matches!(
            out,
            CompletionOutcome::Completed {
                schedule_closed: true,
                ..
            }
        ));
        assert_eq!(
            schedule::list_week(&pool.conn, week).unwrap()[0].status,
            EntryStatus::Completed
        );
    }

    #[test]
    fn storage_failure_rolls_back_everything() {
        let mut pool = open_memory_db().unwrap();
        seed_e0100(&pool);
        pool.conn
            .execute_batch(
                "CREATE TRIGGER boom BEFORE UPDATE ON equipment
                 BEGIN SELECT RAISE(ABORT, 'disk on fire'); END;",
            )
            .unwrap();
        let before = row_counts(&pool.conn);

        let report = CompletionReport::new("E-0100", CycleType::Monthly, "Ann", ymd(2025, 2, 1));
        let err = CompletionLogic::complete(&mut pool, &report, FlagPolicy::Abort, true).unwrap_err();

        assert!(matches!(err, AppError::TransactionFailed(_)), "{err:?}");
        assert_eq!(row_counts(&pool.conn), before);
    }

    #[test]
    fn read_back_disagreement_is_reported_not_retried() {
        let mut pool = open_memory_db().unwrap();
        seed_e0100(&pool);
        pool.conn
            .execute_batch(
                "CREATE TRIGGER tamper AFTER UPDATE OF last_monthly ON equipment
                 WHEN NEW.last_monthly <> '1999-01-01'
                 BEGIN UPDATE equipment SET last_monthly = '1999-01-01' WHERE id = NEW.id; END;",
            )
            .unwrap();

        let report = CompletionReport::new("E-0100", CycleType::Monthly, "Ann", ymd(2025, 2, 1));
        let out = CompletionLogic::complete(&mut pool, &report, FlagPolicy::Abort, true).unwrap();
        assert!(
            matches!(out, CompletionOutcome::VerificationMismatch { .. }),
            "{out:?}"
        );
        assert_eq!(completions::count_completions(&pool.conn).unwrap(), 1);

        // Without verification the same write reports plain success.
        let later = CompletionReport::new("E-0100", CycleType::Monthly, "Ann", ymd(2025, 3, 15));
        let out = CompletionLogic::complete(&mut pool, &later, FlagPolicy::Proceed, false).unwrap();
        assert!(matches!(out, CompletionOutcome::Completed { .. }));
    }
}
