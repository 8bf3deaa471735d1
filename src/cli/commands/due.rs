use super::date_or_today;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::due::equipment_due;
use crate::db::equipment;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::models::cycle::CycleType;
use crate::ui::messages::info;
use crate::utils::colors::{color_for_due, paint};
use crate::utils::formatting::{describe_delta, opt_date};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Due { all, today } = cmd {
        let today = date_or_today(today)?;
        let pool = open_db(&cfg.database)?;

        let mut table = Table::new(&["Equipment", "Cycle", "Last", "Next", "Status", "When"]);
        for eq in equipment::list_active_equipment(&pool.conn)? {
            for cycle in CycleType::NORMAL {
                let Some(status) = equipment_due(&eq, cycle, today) else {
                    continue;
                };
                if !all && !status.is_due_for_scheduling() {
                    continue;
                }
                let dates = eq.cycle(cycle).copied().unwrap_or_default();
                table.add_row(vec![
                    eq.id.clone(),
                    cycle.label().to_string(),
                    opt_date(dates.last),
                    opt_date(dates.next),
                    paint(status.category.label(), color_for_due(status.category)),
                    describe_delta(&status),
                ]);
            }
        }

        if table.is_empty() {
            info(format!("Nothing due as of {}.", today));
        } else {
            print!("{}", table.render());
        }
    }
    Ok(())
}
