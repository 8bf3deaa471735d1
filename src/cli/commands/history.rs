use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::completions;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::formatting::mins2readable;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { id, limit, json } = cmd {
        let pool = open_db(&cfg.database)?;

        let mut records = match id {
            Some(id) => completions::completions_for_equipment(&pool.conn, id)?,
            None => completions::list_completions(&pool.conn, *limit)?,
        };
        if let Some(n) = limit {
            records.truncate(*n);
        }

        if *json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }

        if records.is_empty() {
            info("No completions recorded.");
            return Ok(());
        }

        let mut table = Table::new(&["#", "Date", "Equipment", "Cycle", "Technician", "Time", "Notes"]);
        for r in &records {
            table.add_row(vec![
                r.id.to_string(),
                r.completion_date.to_string(),
                r.equipment_id.clone(),
                r.cycle.label().to_string(),
                r.technician.clone(),
                mins2readable(r.duration_minutes),
                r.notes.clone(),
            ]);
        }
        print!("{}", table.render());
    }
    Ok(())
}
