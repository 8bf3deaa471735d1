use super::check::print_report;
use super::{cycle_arg, date_arg};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::complete::{CompletionLogic, CompletionOutcome, FlagPolicy};
use crate::db::initialize::open_db;
use crate::errors::{AppError, AppResult};
use crate::models::completion::CompletionReport;
use crate::ui::messages::{flag, info, success, warning};

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Complete {
        id,
        cycle,
        tech,
        date,
        hours,
        minutes,
        notes,
        force,
        no_verify,
    } = cmd
    {
        let report = CompletionReport::new(id.trim(), cycle_arg(cycle)?, tech.trim(), date_arg(date)?)
            .with_duration(*hours, *minutes)?
            .with_notes(notes);
        let verify = cfg.verify_completions && !no_verify;
        let policy = if *force {
            FlagPolicy::Proceed
        } else {
            FlagPolicy::Abort
        };

        let mut pool = open_db(&cfg.database)?;
        let mut outcome = CompletionLogic::complete(&mut pool, &report, policy, verify)?;

        if let CompletionOutcome::Flagged(validation) = &outcome {
            print_report(&report, validation);
            if !ask_confirmation("Record this completion anyway?") {
                info("Operation cancelled. Nothing was recorded.");
                return Ok(());
            }
            outcome = CompletionLogic::complete(&mut pool, &report, FlagPolicy::Proceed, verify)?;
        }

        match outcome {
            CompletionOutcome::Completed {
                completion_id,
                schedule_closed,
                flags,
            } => {
                success(format!(
                    "Completion #{} recorded: {} {} by {} on {}",
                    completion_id, report.equipment_id, report.cycle, report.technician, report.date
                ));
                for f in &flags {
                    flag(f);
                }
                if schedule_closed {
                    info("Scheduled entry closed.");
                }
            }
            CompletionOutcome::Rejected(validation) => {
                print_report(&report, &validation);
                return Err(AppError::Rejected(
                    validation
                        .reasons
                        .iter()
                        .map(|r| r.to_string())
                        .collect::<Vec<_>>()
                        .join("; "),
                ));
            }
            CompletionOutcome::Flagged(validation) => {
                // state changed between the two attempts
                print_report(&report, &validation);
                return Err(AppError::Rejected("flagged for review".into()));
            }
            CompletionOutcome::VerificationMismatch {
                completion_id,
                detail,
            } => {
                return Err(AppError::VerificationMismatch(completion_id, detail));
            }
        }
    }
    Ok(())
}
