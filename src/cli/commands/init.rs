use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::schema::table_exists;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::clock::{Clock, SystemClock};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database, the `default` job and the state row
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.as_deref(), cli.test)?;

    if !cli.test {
        info(format!("Config file : {}", Config::config_file().display()));
    }
    info(format!("Database    : {}", cfg.database));

    let pool = DbPool::new(&cfg.database)?;
    let existed = table_exists(&pool.conn, "time_clok_state")?;
    init_db(&pool.conn)?;

    if existed {
        success(format!("Database already initialized at {}", cfg.database));
    } else {
        ttlog_quiet(
            &pool.conn,
            SystemClock.now(),
            "init",
            "",
            &format!("Database initialized at {}", cfg.database),
        );
        success(format!("Database initialized at {}", cfg.database));
    }
    Ok(())
}
