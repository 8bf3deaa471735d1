use super::date_arg;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::catalog::CatalogLogic;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::models::equipment::Equipment;
use crate::ui::messages::success;
use crate::utils::formatting::opt_date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        id,
        description,
        location,
        no_monthly,
        no_six_month,
        no_annual,
        last_monthly,
        last_six_month,
        last_annual,
    } = cmd
    {
        let mut eq = Equipment::new(id.trim());
        eq.description = description.trim().to_string();
        eq.location = location.trim().to_string();
        eq.monthly.enabled = !no_monthly;
        eq.six_month.enabled = !no_six_month;
        eq.annual.enabled = !no_annual;
        eq.monthly.last = last_monthly.as_deref().map(date_arg).transpose()?;
        eq.six_month.last = last_six_month.as_deref().map(date_arg).transpose()?;
        eq.annual.last = last_annual.as_deref().map(date_arg).transpose()?;

        let mut pool = open_db(&cfg.database)?;
        let eq = CatalogLogic::add(&mut pool, eq)?;

        success(format!(
            "Equipment {} added (next monthly {}, six month {}, annual {})",
            eq.id,
            opt_date(eq.monthly.next),
            opt_date(eq.six_month.next),
            opt_date(eq.annual.next)
        ));
    }
    Ok(())
}
