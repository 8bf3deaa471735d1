pub mod completions;
pub mod db_utils;
pub mod equipment;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod schedule;
pub mod stats;
