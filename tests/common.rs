#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rusqlite::Connection;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Monday of the week every scenario plans.
pub const WEEK: &str = "2025-02-03";

/// Monthly-only catalog relative to `WEEK`:
/// E-0001 overdue, E-0002 never done, E-0003 not due yet, E-0004 due in 6 days.
pub const CATALOG_CSV: &str = "\
equipment_id,description,location,monthly,six_month,annual,last_monthly,status
E-0001,Air handler,Bldg A,yes,no,no,1/1/25,
E-0002,Chiller,Roof,yes,no,no,,
E-0003,Boiler,Basement,yes,no,no,2025-01-25,Active
E-0004,Compressor,Bay 2,yes,no,no,01-10-2025,
";

pub fn pm() -> Command {
    cargo_bin_cmd!("pmplanner")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_pmplanner.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Write `content` to a fresh temp file and return its path.
pub fn temp_file(name: &str, ext: &str, content: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_in.{}", name, ext));
    fs::write(&path, content).expect("write temp file");
    path.to_string_lossy().to_string()
}

/// Init the DB and import [`CATALOG_CSV`].
pub fn init_with_catalog(name: &str) -> String {
    let db_path = setup_test_db(name);
    pm().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    let csv = temp_file(name, "csv", CATALOG_CSV);
    pm().args(["--db", &db_path, "--test", "import", &csv])
        .assert()
        .success();

    db_path
}

/// Generate `WEEK` for Ann and Bob.
pub fn generate_week(db_path: &str) {
    pm().args([
        "--db", db_path, "--test", "schedule", "--generate", "--week", WEEK, "--today", WEEK,
        "--tech", "Ann", "--tech", "Bob",
    ])
    .assert()
    .success();
}

pub fn open(db_path: &str) -> Connection {
    Connection::open(db_path).expect("open db")
}

pub fn count(db_path: &str, sql: &str) -> i64 {
    open(db_path)
        .query_row(sql, [], |row| row.get(0))
        .expect("count query")
}
