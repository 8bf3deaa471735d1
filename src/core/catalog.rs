//! Equipment catalog maintenance: single add, CSV import and manual edits.
//!
//! PM dates only enter here when an equipment is created; afterwards the
//! completion processor owns them. Re-importing a known id refreshes its
//! description and location only.

use crate::core::complete::next_due;
use crate::db::pool::DbPool;
use crate::db::{equipment, log};
use crate::errors::{AppError, AppResult};
use crate::models::cycle::CycleType;
use crate::models::equipment::Equipment;
use crate::models::equipment_status::EquipmentStatus;
use crate::ui::messages::warning;
use crate::utils::date;
use serde::Deserialize;
use std::io::Read;

/// One catalog row as it appears in an import file. Every column but the id
/// is optional; blank cells mean "not known".
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogRow {
    #[serde(alias = "id", alias = "Equipment ID", alias = "equipment")]
    pub equipment_id: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub monthly: Option<String>,
    pub six_month: Option<String>,
    pub annual: Option<String>,
    pub last_monthly: Option<String>,
    pub next_monthly: Option<String>,
    pub last_six_month: Option<String>,
    pub next_six_month: Option<String>,
    pub last_annual: Option<String>,
    pub next_annual: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    /// Date cells that did not normalize and were stored as absent.
    pub unparseable_dates: usize,
}

/// Manual edit of flags / status. `None` leaves a field unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub status: Option<EquipmentStatus>,
    pub monthly: Option<bool>,
    pub six_month: Option<bool>,
    pub annual: Option<bool>,
}

fn parse_flag(raw: Option<&str>) -> bool {
    match raw.map(|s| s.trim().to_lowercase()) {
        None => true,
        Some(s) => !matches!(s.as_str(), "0" | "n" | "no" | "false" | "off" | "disabled"),
    }
}

/// Fill in a missing next-due date from the last one.
fn complete_dates(eq: &mut Equipment) {
    let id = eq.id.clone();
    for cycle in CycleType::NORMAL {
        if let Some(d) = eq.cycle_mut(cycle)
            && d.next.is_none()
            && let Some(last) = d.last
        {
            d.next = next_due(&id, cycle, last);
        }
    }
}

impl CatalogRow {
    /// Convert into an `Equipment`, counting dates that failed to parse.
    pub fn into_equipment(self, bad_dates: &mut usize) -> AppResult<Equipment> {
        let id = self.equipment_id.trim();
        if id.is_empty() {
            return Err(AppError::Other("catalog row without equipment id".into()));
        }

        let mut lenient = |raw: Option<String>| -> Option<chrono::NaiveDate> {
            let raw = raw.filter(|s| !s.trim().is_empty())?;
            match date::normalize(&raw) {
                Ok(d) => Some(d),
                Err(e) => {
                    *bad_dates += 1;
                    warning(format!("{}: {} (treated as never done)", id, e));
                    None
                }
            }
        };

        let mut eq = Equipment::new(id);
        eq.description = self.description.unwrap_or_default().trim().to_string();
        eq.location = self.location.unwrap_or_default().trim().to_string();
        eq.monthly.enabled = parse_flag(self.monthly.as_deref());
        eq.six_month.enabled = parse_flag(self.six_month.as_deref());
        eq.annual.enabled = parse_flag(self.annual.as_deref());
        eq.monthly.last = lenient(self.last_monthly);
        eq.monthly.next = lenient(self.next_monthly);
        eq.six_month.last = lenient(self.last_six_month);
        eq.six_month.next = lenient(self.next_six_month);
        eq.annual.last = lenient(self.last_annual);
        eq.annual.next = lenient(self.next_annual);

        let status_raw = self.status.unwrap_or_default();
        eq.status =
            EquipmentStatus::parse(&status_raw).ok_or(AppError::InvalidStatus(status_raw))?;
        if eq.status == EquipmentStatus::RunToFailure {
            eq.monthly.enabled = false;
            eq.six_month.enabled = false;
            eq.annual.enabled = false;
        }

        complete_dates(&mut eq);
        Ok(eq)
    }
}

pub struct CatalogLogic;

impl CatalogLogic {
    pub fn add(pool: &mut DbPool, mut eq: Equipment) -> AppResult<Equipment> {
        complete_dates(&mut eq);
        pool.transaction(|tx| {
            equipment::insert_equipment(tx, &eq)?;
            log::pmlog(tx, "add", &eq.id, "Equipment added")?;
            Ok(((), true))
        })?;
        Ok(eq)
    }

    /// Import (insert or replace) every row of a catalog CSV in one transaction.
    /// Rows that cannot be converted are skipped with a warning.
    pub fn import<R: Read>(pool: &mut DbPool, reader: R) -> AppResult<ImportSummary> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (line, rec) in rdr.deserialize::<CatalogRow>().enumerate() {
            match rec {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warning(format!("row {}: {}", line + 2, e));
                    rows.push(CatalogRow::default());
                }
            }
        }

        pool.transaction(|tx| {
            let mut summary = ImportSummary::default();
            for (line, row) in rows.into_iter().enumerate() {
                let eq = match row.into_equipment(&mut summary.unparseable_dates) {
                    Ok(eq) => eq,
                    Err(e) => {
                        warning(format!("row {} skipped: {}", line + 2, e));
                        summary.skipped += 1;
                        continue;
                    }
                };
                if equipment::upsert_equipment(tx, &eq)? {
                    summary.inserted += 1;
                } else {
                    summary.updated += 1;
                }
            }

            log::pmlog(
                tx,
                "import",
                "",
                &format!(
                    "{} inserted, {} updated, {} skipped, {} unparseable dates",
                    summary.inserted, summary.updated, summary.skipped, summary.unparseable_dates
                ),
            )?;
            Ok((summary, true))
        })
    }

    /// Manual flag/status change, including reactivation after Run to Failure.
    pub fn edit(pool: &mut DbPool, id: &str, req: &EditRequest) -> AppResult<Equipment> {
        pool.transaction(|tx| {
            let eq = equipment::get_equipment(tx, id)?
                .ok_or_else(|| AppError::UnknownEquipment(id.to_string()))?;

            equipment::update_flags(
                tx,
                id,
                req.monthly.unwrap_or(eq.monthly.enabled),
                req.six_month.unwrap_or(eq.six_month.enabled),
                req.annual.unwrap_or(eq.annual.enabled),
            )?;
            if let Some(status) = req.status {
                equipment::update_status(tx, id, status)?;
            }

            let updated = equipment::get_equipment(tx, id)?
                .ok_or_else(|| AppError::UnknownEquipment(id.to_string()))?;
            log::pmlog(
                tx,
                "edit",
                id,
                &format!(
                    "status={} monthly={} six_month={} annual={}",
                    updated.status,
                    updated.monthly.enabled,
                    updated.six_month.enabled,
                    updated.annual.enabled
                ),
            )?;
            Ok((updated, true))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::open_memory_db;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const CSV: &str = "\
equipment_id,description,location,monthly,six_month,annual,last_monthly,last_six_month,last_annual,status
E-0001,Air handler,Bldg A,yes,yes,yes,1/15/25,7/1/24,2024-03-01,
E-0002,Chiller,Roof,yes,no,yes,not a date,,,Active
E-0003,Old pump,Basement,,,,,,,run to failure
,orphan,,,,,,,,
E-0004,Crane,Bay 2,yes,yes,yes,,,,exploded
";

    #[test]
    fn import_normalizes_and_counts() {
        let mut pool = open_memory_db().unwrap();
        let summary = CatalogLogic::import(&mut pool, CSV.as_bytes()).unwrap();

        assert_eq!(summary.inserted, 3);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.unparseable_dates, 1);

        let e1 = equipment::get_equipment(&pool.conn, "E-0001").unwrap().unwrap();
        assert_eq!(e1.monthly.last, Some(ymd(2025, 1, 15)));
        assert_eq!(e1.monthly.next, Some(ymd(2025, 2, 14)));
        assert_eq!(e1.six_month.last, Some(ymd(2024, 7, 1)));
        assert_eq!(e1.annual.last, Some(ymd(2024, 3, 1)));

        let e2 = equipment::get_equipment(&pool.conn, "E-0002").unwrap().unwrap();
        assert!(!e2.six_month.enabled);
        assert_eq!(e2.monthly.last, None);

        let e3 = equipment::get_equipment(&pool.conn, "E-0003").unwrap().unwrap();
        assert_eq!(e3.status, EquipmentStatus::RunToFailure);
        assert!(!e3.monthly.enabled);
    }

    #[test]
    fn reimport_updates_instead_of_duplicating() {
        let mut pool = open_memory_db().unwrap();
        CatalogLogic::import(&mut pool, CSV.as_bytes()).unwrap();
        let summary = CatalogLogic::import(&mut pool, CSV.as_bytes()).unwrap();
        assert_eq!(summary.inserted, 0);
        assert_eq!(summary.updated, 3);
        assert_eq!(equipment::list_equipment(&pool.conn).unwrap().len(), 3);
    }

    #[test]
    fn reimport_keeps_completion_and_run_to_failure_state() {
        use crate::core::complete::{CompletionLogic, FlagPolicy};
        use crate::models::completion::CompletionReport;

        let csv = "equipment_id,description,last_monthly\n\
                   E-0100,Air handler,1/1/25\n\
                   E-0200,Pump,1/1/25\n";
        let mut pool = open_memory_db().unwrap();
        CatalogLogic::import(&mut pool, csv.as_bytes()).unwrap();

        let monthly = CompletionReport::new("E-0100", CycleType::Monthly, "Ann", ymd(2025, 2, 1));
        CompletionLogic::complete(&mut pool, &monthly, FlagPolicy::Abort, true).unwrap();
        let rtf = CompletionReport::new("E-0200", CycleType::RunToFailure, "Bob", ymd(2025, 2, 1));
        CompletionLogic::complete(&mut pool, &rtf, FlagPolicy::Abort, true).unwrap();

        let renamed = csv.replace("Air handler", "Air handler 2");
        let summary = CatalogLogic::import(&mut pool, renamed.as_bytes()).unwrap();
        assert_eq!(summary.updated, 2);

        let e1 = equipment::get_equipment(&pool.conn, "E-0100").unwrap().unwrap();
        assert_eq!(e1.description, "Air handler 2");
        assert_eq!(e1.monthly.last, Some(ymd(2025, 2, 1)));
        assert_eq!(e1.monthly.next, Some(ymd(2025, 3, 3)));

        let e2 = equipment::get_equipment(&pool.conn, "E-0200").unwrap().unwrap();
        assert_eq!(e2.status, EquipmentStatus::RunToFailure);
        assert!(!e2.monthly.enabled && !e2.six_month.enabled && !e2.annual.enabled);
    }

    #[test]
    fn add_rejects_duplicates_and_edit_reactivates() {
        let mut pool = open_memory_db().unwrap();
        CatalogLogic::add(&mut pool, Equipment::new("E-9")).unwrap();
        assert!(matches!(
            CatalogLogic::add(&mut pool, Equipment::new("E-9")),
            Err(AppError::DuplicateEquipment(_))
        ));

        equipment::update_status(&pool.conn, "E-9", EquipmentStatus::RunToFailure).unwrap();
        equipment::update_flags(&pool.conn, "E-9", false, false, false).unwrap();

        let eq = CatalogLogic::edit(
            &mut pool,
            "E-9",
            &EditRequest {
                status: Some(EquipmentStatus::Active),
                monthly: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(eq.is_active());
        assert!(eq.monthly.enabled);
        assert!(!eq.annual.enabled);

        assert!(matches!(
            CatalogLogic::edit(&mut pool, "NOPE", &EditRequest::default()),
            Err(AppError::UnknownEquipment(_))
        ));
    }
}
