use super::{date_arg, date_or_today};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::weekly::{GenerateRequest, WeeklyPlanner};
use crate::db::initialize::open_db;
use crate::db::schedule;
use crate::errors::AppResult;
use crate::models::schedule_entry::{EntryStatus, ScheduleEntry};
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREEN, paint};
use crate::utils::date;
use crate::utils::formatting::mins2readable;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Schedule {
        week,
        generate,
        tech,
        target,
        today,
        json,
    } = cmd
    {
        let today = date_or_today(today)?;
        let week_start = match week {
            Some(w) => date_arg(w)?,
            None => date::week_start_of(today),
        };

        let mut pool = open_db(&cfg.database)?;

        let entries = if *generate {
            let req = GenerateRequest {
                week_start,
                technicians: if tech.is_empty() {
                    cfg.technicians.clone()
                } else {
                    tech.clone()
                },
                weekly_target: target.unwrap_or(cfg.weekly_target),
                today,
            };
            let entries = WeeklyPlanner::generate(&mut pool, &req)?;
            if !*json {
                success(format!(
                    "Week of {}: {} PMs scheduled",
                    week_start,
                    entries.len()
                ));
            }
            entries
        } else {
            schedule::list_week(&pool.conn, week_start)?
        };

        if *json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else if entries.is_empty() {
            info(format!("No schedule for the week of {}.", week_start));
        } else {
            print_table(&entries);
        }
    }
    Ok(())
}

fn print_table(entries: &[ScheduleEntry]) {
    let mut table = Table::new(&["#", "Day", "Technician", "Equipment", "Cycle", "Status", "Time"]);
    for e in entries {
        let status = match e.status {
            EntryStatus::Completed => paint(
                &format!("done {}", e.completed_date.map(|d| d.to_string()).unwrap_or_default()),
                GREEN,
            ),
            EntryStatus::Scheduled => "planned".to_string(),
        };
        table.add_row(vec![
            e.id.to_string(),
            e.scheduled_date.format("%a %Y-%m-%d").to_string(),
            e.technician.clone(),
            e.equipment_id.clone(),
            e.cycle.label().to_string(),
            status,
            e.duration_minutes.map(mins2readable).unwrap_or_default(),
        ]);
    }
    print!("{}", table.render());
}
