use crate::db::pool::DbPool;
use crate::db::{completions, equipment, migrate, schedule};
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

/// Counts shown by `db --info`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DbStats {
    pub active: i64,
    pub missing: i64,
    pub run_to_failure: i64,
    pub completions: i64,
    pub schedule_entries: i64,
    pub schedule_completed: i64,
    pub first_completion: Option<String>,
    pub last_completion: Option<String>,
    pub migrations: usize,
}

pub fn collect(pool: &DbPool) -> AppResult<DbStats> {
    use crate::models::equipment_status::EquipmentStatus;

    let mut stats = DbStats::default();
    for (status, n) in equipment::count_by_status(&pool.conn)? {
        match status {
            EquipmentStatus::Active => stats.active = n,
            EquipmentStatus::Missing => stats.missing = n,
            EquipmentStatus::RunToFailure => stats.run_to_failure = n,
        }
    }

    stats.completions = completions::count_completions(&pool.conn)?;
    (stats.schedule_entries, stats.schedule_completed) = schedule::count_entries(&pool.conn)?;

    stats.first_completion = pool
        .conn
        .query_row("SELECT MIN(completion_date) FROM completions", [], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()?
        .flatten();
    stats.last_completion = pool
        .conn
        .query_row("SELECT MAX(completion_date) FROM completions", [], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()?
        .flatten();

    stats.migrations = migrate::applied_versions(&pool.conn)?.len();
    Ok(stats)
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    let s = collect(pool)?;

    println!(
        "{}• Equipment:{} {}{} active{}, {} missing, {} run to failure",
        CYAN, RESET, GREEN, s.active, RESET, s.missing, s.run_to_failure
    );
    println!(
        "{}• Completions:{} {}{}{}",
        CYAN, RESET, GREEN, s.completions, RESET
    );

    let dash = format!("{GREY}--{RESET}");
    println!("{}• Completion dates:{}", CYAN, RESET);
    println!("    from: {}", s.first_completion.as_deref().unwrap_or(&dash));
    println!("    to:   {}", s.last_completion.as_deref().unwrap_or(&dash));

    println!(
        "{}• Schedule entries:{} {} ({} completed)",
        CYAN, RESET, s.schedule_entries, s.schedule_completed
    );
    println!("{}• Migrations applied:{} {}", CYAN, RESET, s.migrations);

    println!();
    Ok(())
}
