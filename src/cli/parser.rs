use crate::models::period::PeriodKind;
use clap::{Parser, Subcommand};

/// Command-line interface definition for clok
#[derive(Parser)]
#[command(
    name = "clok",
    version = env!("CARGO_PKG_VERSION"),
    about = "A personal time clock: clock in and out of jobs, keep a journal, report hours",
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

/// Time expressions accepted by `--when` / `--out`:
/// `17:45`, `1:00PM`, `2020-09-01 13:00`, `_30m` (30 minutes ago), `+1h`,
/// and for `in --when` also `2020-09-01 09:00-17:00`.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Clock in (or record a finished span with --out or a time range)
    In {
        #[arg(long, allow_hyphen_values = true, help = "Clock-in time, or a 'YYYY-MM-DD HH:MM-HH:MM' range")]
        when: Option<String>,

        #[arg(long, allow_hyphen_values = true, help = "Clock-out time: record a closed span")]
        out: Option<String>,

        #[arg(long, conflicts_with_all = ["when", "out"], help = "First clock-in of the day: set it a few minutes in the past")]
        first: bool,

        #[arg(short = 'm', long = "message", help = "Journal message to add to the session")]
        message: Option<String>,
    },

    /// Clock out of the current session
    Out {
        #[arg(long, allow_hyphen_values = true, help = "Clock-out time")]
        when: Option<String>,

        #[arg(long = "id", help = "Clock out of this session instead of the current one")]
        id: Option<i64>,

        #[arg(short = 'm', long = "message", help = "Journal message to add to the session")]
        message: Option<String>,

        #[arg(short = 'y', long = "yes", help = "Do not ask for confirmation on long sessions")]
        yes: bool,
    },

    /// Add, show or delete journal entries
    Journal {
        /// The journal message to record
        message: Option<String>,

        #[arg(long, allow_hyphen_values = true, help = "Time of the entry")]
        when: Option<String>,

        #[arg(long = "id", help = "Attach to this session instead of the current one")]
        session: Option<i64>,

        #[arg(long, help = "Delete a journal entry by id")]
        delete: Option<i64>,

        #[arg(long, help = "Show the entries of a period")]
        show: bool,

        #[arg(long, value_enum, default_value = "day")]
        period: PeriodKind,

        #[arg(long, help = "Period key: YYYYMMDD or YYYY-MM-DD for days, 0-53 for weeks, 1-12 for months")]
        key: Option<String>,

        #[arg(long = "all", help = "Include every job")]
        all_jobs: bool,

        #[arg(short = 'y', long = "yes", help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Show the sessions and total hours of a period
    Show {
        #[arg(value_enum, default_value = "week")]
        period: PeriodKind,

        #[arg(long, help = "Period key: YYYYMMDD or YYYY-MM-DD for days, 0-53 for weeks, 1-12 for months")]
        key: Option<String>,

        #[arg(long = "all", help = "Include every job")]
        all_jobs: bool,

        #[arg(long, short = 'j', help = "Print journal entries under each session")]
        journal: bool,
    },

    /// List jobs, or create one
    Jobs {
        #[arg(long, help = "Create a new job")]
        add: Option<String>,
    },

    /// Switch the current job (closes the open session of the old one)
    Switch {
        name: String,

        #[arg(long, help = "Create the job if it does not exist")]
        create: bool,
    },

    /// Delete a session (or a journal entry with --journal) by id
    Delete {
        id: i64,

        #[arg(long, help = "The id is a journal entry id")]
        journal: bool,

        #[arg(short = 'y', long = "yes", help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Delete every session of a period
    Clear {
        #[arg(value_enum, default_value = "day")]
        period: PeriodKind,

        #[arg(long, help = "Period key: YYYYMMDD or YYYY-MM-DD for days, 0-53 for weeks, 1-12 for months")]
        key: Option<String>,

        #[arg(long = "all", help = "Include every job")]
        all_jobs: bool,

        #[arg(short = 'y', long = "yes", help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Dump the whole database to JSON
    Dump {
        #[arg(value_name = "FILE")]
        file: Option<String>,
    },

    /// Import a JSON dump
    Import {
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Recompute period keys and spans, fix the state row
    Repair,

    /// Print the internal log table
    Log,
}
