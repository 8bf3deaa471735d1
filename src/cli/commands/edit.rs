use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::catalog::{CatalogLogic, EditRequest};
use crate::db::initialize::open_db;
use crate::errors::{AppError, AppResult};
use crate::models::equipment_status::EquipmentStatus;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        status,
        monthly,
        six_month,
        annual,
    } = cmd
    {
        let status = status
            .as_deref()
            .map(|s| EquipmentStatus::parse(s).ok_or_else(|| AppError::InvalidStatus(s.into())))
            .transpose()?;

        let req = EditRequest {
            status,
            monthly: *monthly,
            six_month: *six_month,
            annual: *annual,
        };
        if req == EditRequest::default() {
            info("Nothing to change.");
            return Ok(());
        }

        let mut pool = open_db(&cfg.database)?;
        let eq = CatalogLogic::edit(&mut pool, id, &req)?;

        success(format!(
            "{}: status {}, monthly {}, six month {}, annual {}",
            eq.id, eq.status, eq.monthly.enabled, eq.six_month.enabled, eq.annual.enabled
        ));
    }
    Ok(())
}
