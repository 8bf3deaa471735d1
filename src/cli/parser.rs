use clap::{Parser, Subcommand};

/// Command-line interface definition for pmplanner
/// Preventive-maintenance scheduling and completion tracking with SQLite
#[derive(Parser)]
#[command(
    name = "pmplanner",
    version = env!("CARGO_PKG_VERSION"),
    about = "Plan weekly preventive maintenance and validate completion reports using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "op", help = "Only rows of this operation (complete, generate, ...)")]
        operation: Option<String>,
    },

    /// Add one equipment to the catalog
    Add {
        /// Equipment identifier (e.g. E-0100)
        id: String,

        #[arg(long = "desc", default_value = "")]
        description: String,

        #[arg(long = "location", default_value = "")]
        location: String,

        #[arg(long = "no-monthly", help = "Monthly PM not required")]
        no_monthly: bool,

        #[arg(long = "no-six-month", help = "Six-month PM not required")]
        no_six_month: bool,

        #[arg(long = "no-annual", help = "Annual PM not required")]
        no_annual: bool,

        #[arg(long = "last-monthly", value_name = "DATE")]
        last_monthly: Option<String>,

        #[arg(long = "last-six-month", value_name = "DATE")]
        last_six_month: Option<String>,

        #[arg(long = "last-annual", value_name = "DATE")]
        last_annual: Option<String>,
    },

    /// Import or update equipment from a catalog CSV
    Import {
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Change status or required cycles of one equipment
    Edit {
        id: String,

        #[arg(long = "status", help = "active, missing or run-to-failure")]
        status: Option<String>,

        #[arg(long = "monthly", value_name = "BOOL")]
        monthly: Option<bool>,

        #[arg(long = "six-month", value_name = "BOOL")]
        six_month: Option<bool>,

        #[arg(long = "annual", value_name = "BOOL")]
        annual: Option<bool>,
    },

    /// Show one equipment with its due status per cycle
    Show { id: String },

    /// List equipment due for scheduling
    Due {
        #[arg(long = "all", help = "Show every enabled cycle, not only due ones")]
        all: bool,

        #[arg(long = "today", value_name = "DATE", help = "Reference date (default: today)")]
        today: Option<String>,
    },

    /// Generate or list a weekly schedule
    Schedule {
        #[arg(long = "week", value_name = "DATE", help = "Week start (default: this Monday)")]
        week: Option<String>,

        #[arg(long = "generate", help = "Regenerate the week from the current catalog")]
        generate: bool,

        #[arg(
            long = "tech",
            value_name = "NAME",
            help = "Technician roster, in order (overrides config)"
        )]
        tech: Vec<String>,

        #[arg(long = "target", help = "Maximum number of PMs for the week")]
        target: Option<usize>,

        #[arg(long = "today", value_name = "DATE", help = "Reference date (default: today)")]
        today: Option<String>,

        #[arg(long = "json", help = "Print entries as JSON")]
        json: bool,
    },

    /// Validate a completion report without recording it
    Check {
        id: String,
        cycle: String,
        tech: String,
        date: String,
    },

    /// Record a completed PM
    Complete {
        id: String,
        /// Monthly, "Six Month", Annual, "CANNOT FIND" or "Run to Failure"
        cycle: String,
        tech: String,
        date: String,

        #[arg(long = "hours", default_value_t = 0)]
        hours: u32,

        #[arg(long = "minutes", default_value_t = 0)]
        minutes: u32,

        #[arg(long = "notes", default_value = "")]
        notes: String,

        #[arg(long = "force", help = "Record even when the report is flagged")]
        force: bool,

        #[arg(long = "no-verify", help = "Skip read-back verification")]
        no_verify: bool,
    },

    /// Show completion history
    History {
        id: Option<String>,

        #[arg(long = "limit", help = "Only the most recent N records")]
        limit: Option<usize>,

        #[arg(long = "json", help = "Print records as JSON")]
        json: bool,
    },
}
