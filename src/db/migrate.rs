use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. It doubles as the migration ledger.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

const INITIAL_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS equipment (
        id                 TEXT PRIMARY KEY NOT NULL,
        description        TEXT NOT NULL DEFAULT '',
        location           TEXT NOT NULL DEFAULT '',
        monthly_enabled    INTEGER NOT NULL DEFAULT 1,
        six_month_enabled  INTEGER NOT NULL DEFAULT 1,
        annual_enabled     INTEGER NOT NULL DEFAULT 1,
        last_monthly       TEXT,
        next_monthly       TEXT,
        last_six_month     TEXT,
        next_six_month     TEXT,
        last_annual        TEXT,
        next_annual        TEXT,
        status             TEXT NOT NULL DEFAULT 'active'
                           CHECK(status IN ('active','missing','run_to_failure')),
        created_at         TEXT NOT NULL,
        updated_at         TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS completions (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        equipment_id      TEXT NOT NULL REFERENCES equipment(id),
        cycle             TEXT NOT NULL
                          CHECK(cycle IN ('monthly','six_month','annual','cannot_find','run_to_failure')),
        technician        TEXT NOT NULL,
        completion_date   TEXT NOT NULL,
        duration_minutes  INTEGER NOT NULL DEFAULT 0,
        notes             TEXT NOT NULL DEFAULT '',
        created_at        TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_completions_equipment_cycle_date
        ON completions(equipment_id, cycle, completion_date);

    CREATE TABLE IF NOT EXISTS schedule_entries (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        week_start        TEXT NOT NULL,
        equipment_id      TEXT NOT NULL REFERENCES equipment(id),
        cycle             TEXT NOT NULL
                          CHECK(cycle IN ('monthly','six_month','annual')),
        technician        TEXT NOT NULL,
        scheduled_date    TEXT NOT NULL,
        status            TEXT NOT NULL DEFAULT 'scheduled'
                          CHECK(status IN ('scheduled','completed')),
        completed_date    TEXT,
        duration_minutes  INTEGER,
        UNIQUE(week_start, equipment_id, cycle)
    );

    CREATE INDEX IF NOT EXISTS idx_schedule_week ON schedule_entries(week_start);
"#;

/// Completion rows are an append-only log and a completed entry never goes back.
const LOG_GUARDS: &str = r#"
    CREATE TRIGGER IF NOT EXISTS completions_no_update
    BEFORE UPDATE ON completions
    BEGIN
        SELECT RAISE(ABORT, 'completions are append-only');
    END;

    CREATE TRIGGER IF NOT EXISTS completions_no_delete
    BEFORE DELETE ON completions
    BEGIN
        SELECT RAISE(ABORT, 'completions are append-only');
    END;

    CREATE TRIGGER IF NOT EXISTS schedule_completed_is_terminal
    BEFORE UPDATE OF status ON schedule_entries
    WHEN OLD.status = 'completed' AND NEW.status <> 'completed'
    BEGIN
        SELECT RAISE(ABORT, 'completed schedule entries cannot be reopened');
    END;
"#;

/// Ordered migration list: (version, description, SQL).
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250301_0001_initial_schema",
        "Created equipment, completions and schedule_entries tables",
        INITIAL_SCHEMA,
    ),
    (
        "20250315_0002_log_guards",
        "Added append-only and terminal-status triggers",
        LOG_GUARDS,
    ),
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, version: &str, description: &str, sql: &str) -> Result<()> {
    // Schema change and ledger row land together or not at all.
    let batch = format!(
        "BEGIN;
         {sql}
         INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', '{version}', '{description}');
         COMMIT;"
    );
    if let Err(e) = conn.execute_batch(&batch) {
        let _ = conn.execute_batch("ROLLBACK;");
        return Err(e);
    }

    success(format!("Migration applied: {} → {}", version, description));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by `db::initialize::open_db()` and by `db --migrate`.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for (version, description, sql) in MIGRATIONS {
        if !is_applied(conn, version)? {
            apply(conn, version, description, sql)?;
        }
    }

    Ok(())
}

/// Versions recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
