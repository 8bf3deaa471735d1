use crate::core::calculator::due::equipment_due;
use crate::db::pool::DbPool;
use crate::db::{equipment, log, schedule};
use crate::errors::{AppError, AppResult};
use crate::models::cycle::CycleType;
use crate::models::due::DueStatus;
use crate::models::equipment::Equipment;
use crate::models::schedule_entry::{EntryStatus, ScheduleEntry};
use crate::utils::date;
use chrono::{Duration, NaiveDate};
use std::cmp::Ordering;

pub const DEFAULT_WEEKLY_TARGET: usize = 110;
const WORKDAYS: usize = 5;

/// Inputs of one weekly generation.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub week_start: NaiveDate,
    /// Roster in assignment order.
    pub technicians: Vec<String>,
    pub weekly_target: usize,
    /// Reference date for due-status evaluation.
    pub today: NaiveDate,
}

/// One equipment/cycle pair picked for the week, before assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub equipment_id: String,
    pub cycle: CycleType,
    pub due: DueStatus,
}

pub struct WeeklyPlanner;

impl WeeklyPlanner {
    /// Regenerate the schedule of `req.week_start`.
    ///
    /// Existing entries of that week are deleted and replaced in a single
    /// transaction; the returned list is what was stored.
    pub fn generate(pool: &mut DbPool, req: &GenerateRequest) -> AppResult<Vec<ScheduleEntry>> {
        let roster: Vec<String> = req
            .technicians
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if roster.is_empty() {
            return Err(AppError::EmptyRoster);
        }

        pool.transaction(|tx| {
            let removed = schedule::delete_week(tx, req.week_start)?;

            let catalog = equipment::list_active_equipment(tx)?;
            let candidates = select_candidates(&catalog, req.today, req.weekly_target);
            let mut entries = assign(&candidates, &roster, req.week_start);

            for entry in entries.iter_mut() {
                entry.id = schedule::insert_entry(tx, entry)?;
            }

            log::pmlog(
                tx,
                "generate",
                &date::to_canonical(req.week_start),
                &format!(
                    "{} entries for {} technicians ({} replaced)",
                    entries.len(),
                    roster.len(),
                    removed
                ),
            )?;

            Ok((entries, true))
        })
    }
}

/// Pick at most one due cycle per equipment, rank, and cap at `target`.
pub fn select_candidates(catalog: &[Equipment], today: NaiveDate, target: usize) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = catalog
        .iter()
        .filter(|eq| eq.is_active())
        .filter_map(|eq| pick_cycle(eq, today))
        .collect();

    candidates.sort_by(rank);
    candidates.truncate(target);
    candidates
}

/// Monthly wins when due. Annual, then Six-Month, only when Monthly is not due.
fn pick_cycle(eq: &Equipment, today: NaiveDate) -> Option<Candidate> {
    let due = |cycle: CycleType| {
        equipment_due(eq, cycle, today)
            .filter(DueStatus::is_due_for_scheduling)
            .map(|due| Candidate {
                equipment_id: eq.id.clone(),
                cycle,
                due,
            })
    };

    due(CycleType::Monthly)
        .or_else(|| due(CycleType::Annual))
        .or_else(|| due(CycleType::SixMonth))
}

/// NeverDone/Overdue first, then most overdue, then id.
fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    let urgency = |c: &Candidate| if c.due.category.is_urgent() { 0 } else { 1 };
    let delta = |c: &Candidate| c.due.days_delta.unwrap_or(i64::MIN);

    urgency(a)
        .cmp(&urgency(b))
        .then_with(|| delta(a).cmp(&delta(b)))
        .then_with(|| a.equipment_id.cmp(&b.equipment_id))
        .then_with(|| a.cycle.cmp(&b.cycle))
}

/// Round-robin over the roster; each technician's k-th job lands on weekday k mod 5.
pub fn assign(candidates: &[Candidate], roster: &[String], week_start: NaiveDate) -> Vec<ScheduleEntry> {
    if roster.is_empty() {
        return Vec::new();
    }
    let mut per_tech = vec![0usize; roster.len()];

    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let t = i % roster.len();
            let k = per_tech[t];
            per_tech[t] += 1;

            ScheduleEntry {
                id: 0,
                week_start,
                equipment_id: c.equipment_id.clone(),
                cycle: c.cycle,
                technician: roster[t].clone(),
                scheduled_date: week_start + Duration::days((k % WORKDAYS) as i64),
                status: EntryStatus::Scheduled,
                completed_date: None,
                duration_minutes: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::open_memory_db;
    use crate::models::due::DueCategory;
    use crate::models::equipment_status::EquipmentStatus;
    use std::collections::HashMap;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn techs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn current(eq: &mut Equipment, today: NaiveDate) {
        for c in [&mut eq.monthly, &mut eq.six_month, &mut eq.annual] {
            c.last = Some(today);
            c.next = Some(today + Duration::days(100));
        }
    }

    #[test]
    fn monthly_takes_precedence_over_annual() {
        let today = ymd(2025, 3, 3);
        let eq = Equipment::new("E-1"); // everything never done

        let picked = select_candidates(&[eq], today, 10);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].cycle, CycleType::Monthly);
    }

    #[test]
    fn annual_then_six_month_when_monthly_not_due() {
        let today = ymd(2025, 3, 3);
        let mut a = Equipment::new("E-1");
        current(&mut a, today);
        a.annual.next = Some(today - Duration::days(3));
        a.six_month.next = Some(today - Duration::days(3));

        let mut b = Equipment::new("E-2");
        current(&mut b, today);
        b.six_month.next = Some(today + Duration::days(5));

        let picked = select_candidates(&[a, b], today, 10);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].cycle, CycleType::Annual);
        assert_eq!(picked[1].cycle, CycleType::SixMonth);
        assert_eq!(picked[1].due.category, DueCategory::DueSoon);
    }

    #[test]
    fn urgent_work_survives_the_cap() {
        let today = ymd(2025, 3, 3);
        let mut soon = Equipment::new("A-1");
        current(&mut soon, today);
        soon.monthly.next = Some(today + Duration::days(2));

        let mut late = Equipment::new("Z-9");
        current(&mut late, today);
        late.monthly.next = Some(today - Duration::days(2));

        let picked = select_candidates(&[soon, late], today, 1);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].equipment_id, "Z-9");
    }

    #[test]
    fn inactive_equipment_is_skipped() {
        let today = ymd(2025, 3, 3);
        let mut eq = Equipment::new("E-1");
        eq.status = EquipmentStatus::RunToFailure;
        assert!(select_candidates(&[eq], today, 10).is_empty());
    }

    #[test]
    fn round_robin_is_fair_and_exact() {
        let week = ymd(2025, 3, 3);
        for (total, n) in [(0usize, 3usize), (7, 3), (110, 4), (5, 8), (12, 1)] {
            let candidates: Vec<Candidate> = (0..total)
                .map(|i| Candidate {
                    equipment_id: format!("E-{i:04}"),
                    cycle: CycleType::Monthly,
                    due: DueStatus {
                        category: DueCategory::NeverDone,
                        days_delta: None,
                    },
                })
                .collect();
            let roster: Vec<String> = (0..n).map(|i| format!("T{i}")).collect();

            let entries = assign(&candidates, &roster, week);
            assert_eq!(entries.len(), total);

            let mut counts: HashMap<&str, usize> = HashMap::new();
            for e in &entries {
                *counts.entry(e.technician.as_str()).or_default() += 1;
                assert!(date::in_week(e.scheduled_date, week));
                assert!(e.scheduled_date < week + Duration::days(5));
            }
            for (i, t) in roster.iter().enumerate() {
                let got = counts.get(t.as_str()).copied().unwrap_or(0);
                let expected = total / n + usize::from(i < total % n);
                assert_eq!(got, expected, "tech {t} for T={total}, N={n}");
            }
        }
    }

    #[test]
    fn generation_is_deterministic_and_replaces() {
        let mut pool = open_memory_db().unwrap();
        for i in 0..9 {
            equipment::insert_equipment(&pool.conn, &Equipment::new(&format!("E-{i:03}"))).unwrap();
        }
        let req = GenerateRequest {
            week_start: ymd(2025, 3, 3),
            technicians: techs(&["Ann", "Bob"]),
            weekly_target: DEFAULT_WEEKLY_TARGET,
            today: ymd(2025, 3, 3),
        };

        let first = WeeklyPlanner::generate(&mut pool, &req).unwrap();
        let second = WeeklyPlanner::generate(&mut pool, &req).unwrap();

        let strip = |v: &[ScheduleEntry]| {
            v.iter()
                .map(|e| (e.equipment_id.clone(), e.cycle, e.technician.clone(), e.scheduled_date))
                .collect::<Vec<_>>()
        };
        assert_eq!(first.len(), 9);
        assert_eq!(strip(&first), strip(&second));
        assert_eq!(schedule::list_week(&pool.conn, req.week_start).unwrap().len(), 9);
    }

    #[test]
    fn empty_catalog_and_single_technician() {
        let mut pool = open_memory_db().unwrap();
        let mut req = GenerateRequest {
            week_start: ymd(2025, 3, 3),
            technicians: techs(&["Solo"]),
            weekly_target: 10,
            today: ymd(2025, 3, 3),
        };
        assert!(WeeklyPlanner::generate(&mut pool, &req).unwrap().is_empty());

        for i in 0..4 {
            equipment::insert_equipment(&pool.conn, &Equipment::new(&format!("P{i}"))).unwrap();
        }
        let entries = WeeklyPlanner::generate(&mut pool, &req).unwrap();
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| e.technician == "Solo"));

        req.technicians = techs(&["  "]);
        assert!(matches!(
            WeeklyPlanner::generate(&mut pool, &req),
            Err(AppError::EmptyRoster)
        ));
        // The failed call must not have wiped the week.
        assert_eq!(schedule::list_week(&pool.conn, req.week_start).unwrap().len(), 4);
    }
}
