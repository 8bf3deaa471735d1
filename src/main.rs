//! pmplanner main entrypoint.

use pmplanner::run;
use pmplanner::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
