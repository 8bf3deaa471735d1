//! Unified application error type.
//! Every layer (db, core, cli, utils) returns AppError so the binary has a
//! single place to turn failures into messages and exit codes.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// Commit-time failure inside a completion or generation transaction.
    /// The transaction was rolled back; the cause is kept.
    #[error("Transaction failed and was rolled back: {0}")]
    TransactionFailed(rusqlite::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid cycle type: {0}")]
    InvalidCycle(String),

    #[error("Invalid equipment status: {0}")]
    InvalidStatus(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Import error: {0}")]
    Import(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Domain errors
    // ---------------------------
    #[error("Unknown equipment: {0}")]
    UnknownEquipment(String),

    #[error("Equipment already exists: {0}")]
    DuplicateEquipment(String),

    #[error("Completion rejected: {0}")]
    Rejected(String),

    #[error("Completion #{0} was committed but reads back differently: {1}")]
    VerificationMismatch(i64, String),

    #[error("No technicians configured: add names under `technicians` or pass --tech")]
    EmptyRoster,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
