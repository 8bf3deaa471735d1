use crate::models::cycle::CycleType;
use crate::models::due::{DueCategory, DueStatus};
use crate::models::equipment::Equipment;
use chrono::{Duration, NaiveDate};

/// How far ahead a due date still counts as "due for scheduling".
pub const SCHEDULING_HORIZON_DAYS: i64 = 14;

const DUE_SOON_DAYS: i64 = 7;
const DUE_WITHIN_MONTH_DAYS: i64 = 30;

/// Classify one cycle.
///
/// The effective due date is `next` when known, otherwise `last + cycle_length_days`.
/// With neither date the cycle has never been done.
pub fn status(
    last: Option<NaiveDate>,
    next: Option<NaiveDate>,
    cycle_length_days: i64,
    today: NaiveDate,
) -> DueStatus {
    let effective_due = match (next, last) {
        (Some(n), _) => n,
        (None, Some(l)) => l + Duration::days(cycle_length_days),
        (None, None) => {
            return DueStatus {
                category: DueCategory::NeverDone,
                days_delta: None,
            };
        }
    };

    let delta = (effective_due - today).num_days();
    let category = if delta < 0 {
        DueCategory::Overdue
    } else if delta <= DUE_SOON_DAYS {
        DueCategory::DueSoon
    } else if delta <= DUE_WITHIN_MONTH_DAYS {
        DueCategory::DueWithinMonth
    } else {
        DueCategory::Current
    };

    DueStatus {
        category,
        days_delta: Some(delta),
    }
}

impl DueStatus {
    pub fn is_due_for_scheduling(&self) -> bool {
        match self.category {
            DueCategory::NeverDone | DueCategory::Overdue | DueCategory::DueSoon => true,
            DueCategory::DueWithinMonth | DueCategory::Current => self
                .days_delta
                .is_some_and(|d| d <= SCHEDULING_HORIZON_DAYS),
        }
    }
}

/// Due status of an enabled normal cycle; `None` if the cycle is disabled
/// or is a pseudo-cycle.
pub fn equipment_due(eq: &Equipment, cycle: CycleType, today: NaiveDate) -> Option<DueStatus> {
    let dates = eq.cycle(cycle)?;
    if !dates.enabled {
        return None;
    }
    let length = cycle.length_days()?;
    Some(status(dates.last, dates.next, length, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn never_done_without_dates() {
        let s = status(None, None, 30, ymd(2025, 1, 1));
        assert_eq!(s.category, DueCategory::NeverDone);
        assert_eq!(s.days_delta, None);
        assert!(s.is_due_for_scheduling());
    }

    #[test]
    fn delta_equals_cycle_length_on_completion_day() {
        let last = ymd(2025, 2, 1);
        for len in [30, 180, 365] {
            let s = status(Some(last), None, len, last);
            assert_eq!(s.days_delta, Some(len));
        }
    }

    #[test]
    fn next_date_wins_over_last() {
        let s = status(
            Some(ymd(2024, 1, 1)),
            Some(ymd(2025, 1, 11)),
            30,
            ymd(2025, 1, 1),
        );
        assert_eq!(s.days_delta, Some(10));
        assert_eq!(s.category, DueCategory::DueWithinMonth);
    }

    #[test]
    fn category_boundaries() {
        let today = ymd(2025, 6, 1);
        let at = |d: i64| status(None, Some(today + Duration::days(d)), 30, today);

        assert_eq!(at(-1).category, DueCategory::Overdue);
        assert_eq!(at(0).category, DueCategory::DueSoon);
        assert_eq!(at(7).category, DueCategory::DueSoon);
        assert_eq!(at(8).category, DueCategory::DueWithinMonth);
        assert_eq!(at(30).category, DueCategory::DueWithinMonth);
        assert_eq!(at(31).category, DueCategory::Current);
    }

    #[test]
    fn scheduling_horizon_is_two_weeks() {
        let today = ymd(2025, 6, 1);
        let at = |d: i64| status(None, Some(today + Duration::days(d)), 30, today);

        assert!(at(-40).is_due_for_scheduling());
        assert!(at(14).is_due_for_scheduling());
        assert!(!at(15).is_due_for_scheduling());
        assert!(!at(90).is_due_for_scheduling());
    }

    #[test]
    fn disabled_cycle_is_not_evaluated() {
        let mut eq = Equipment::new("E-1");
        eq.annual.enabled = false;
        let today = ymd(2025, 1, 1);
        assert!(equipment_due(&eq, CycleType::Annual, today).is_none());
        assert!(equipment_due(&eq, CycleType::CannotFind, today).is_none());
        assert_eq!(
            equipment_due(&eq, CycleType::Monthly, today).map(|s| s.category),
            Some(DueCategory::NeverDone)
        );
    }
}
