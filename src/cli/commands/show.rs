use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::due::equipment_due;
use crate::db::initialize::open_db;
use crate::db::{completions, equipment};
use crate::errors::{AppError, AppResult};
use crate::models::cycle::CycleType;
use crate::ui::messages::header;
use crate::utils::colors::{color_for_due, color_for_status, paint};
use crate::utils::date;
use crate::utils::formatting::{describe_delta, mins2readable, opt_date};
use crate::utils::table::Table;

const RECENT: usize = 5;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { id } = cmd {
        let pool = open_db(&cfg.database)?;
        let eq = equipment::get_equipment(&pool.conn, id)?
            .ok_or_else(|| AppError::UnknownEquipment(id.clone()))?;
        let today = date::today();

        header(&eq.id);
        println!("Description : {}", paint(&eq.description, ""));
        println!("Location    : {}", paint(&eq.location, ""));
        println!(
            "Status      : {}",
            paint(eq.status.label(), color_for_status(eq.status))
        );
        println!();

        let mut table = Table::new(&["Cycle", "Required", "Last", "Next", "Due", "When"]);
        for cycle in CycleType::NORMAL {
            let Some(dates) = eq.cycle(cycle) else {
                continue;
            };
            let (due, when) = match equipment_due(&eq, cycle, today) {
                Some(s) => (
                    paint(s.category.label(), color_for_due(s.category)),
                    describe_delta(&s),
                ),
                None => (paint("--", ""), String::new()),
            };
            table.add_row(vec![
                cycle.label().to_string(),
                if dates.enabled { "yes" } else { "no" }.to_string(),
                opt_date(dates.last),
                opt_date(dates.next),
                due,
                when,
            ]);
        }
        print!("{}", table.render());

        let recent = completions::completions_for_equipment(&pool.conn, &eq.id)?;
        if !recent.is_empty() {
            println!();
            println!("Recent completions:");
            for rec in recent.iter().take(RECENT) {
                println!(
                    "  #{} {} {} by {} ({})",
                    rec.id,
                    rec.completion_date,
                    rec.cycle,
                    rec.technician,
                    mins2readable(rec.duration_minutes)
                );
            }
        }
    }
    Ok(())
}
