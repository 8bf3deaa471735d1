use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::catalog::CatalogLogic;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::fs::File;
use std::io::BufReader;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file } = cmd {
        let reader = BufReader::new(File::open(file)?);

        let mut pool = open_db(&cfg.database)?;
        let summary = CatalogLogic::import(&mut pool, reader)?;

        success(format!(
            "Imported {}: {} new, {} updated, {} skipped",
            file, summary.inserted, summary.updated, summary.skipped
        ));
        if summary.unparseable_dates > 0 {
            warning(format!(
                "{} date(s) could not be read and were left empty",
                summary.unparseable_dates
            ));
        }
    }
    Ok(())
}
