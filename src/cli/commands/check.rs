use super::{cycle_arg, date_arg};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::validator::{ConflictValidator, ValidationReport};
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::models::completion::CompletionReport;
use crate::ui::messages::{error, flag, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Check {
        id,
        cycle,
        tech,
        date,
    } = cmd
    {
        let report = CompletionReport::new(id.trim(), cycle_arg(cycle)?, tech.trim(), date_arg(date)?);
        let pool = open_db(&cfg.database)?;
        let validation = ConflictValidator::validate(&pool.conn, &report)?;
        print_report(&report, &validation);
    }
    Ok(())
}

/// Verdict line plus one line per reason.
pub(crate) fn print_report(report: &CompletionReport, validation: &ValidationReport) {
    let what = format!(
        "{} {} by {} on {}",
        report.equipment_id, report.cycle, report.technician, report.date
    );
    if validation.ok {
        success(format!("{}: no conflicts", what));
        return;
    }
    if validation.rejected {
        error(format!("{}: rejected", what));
    } else {
        warning(format!("{}: flagged for review", what));
    }
    for reason in &validation.reasons {
        flag(reason);
    }
}
