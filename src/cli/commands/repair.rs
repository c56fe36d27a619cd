use crate::config::Config;
use crate::core::repair::RepairLogic;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::clock::{Clock, SystemClock};

/// Runs on the bare pool: the state row may be what needs fixing.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    let report = RepairLogic::repair(&pool.conn, SystemClock.now())?;
    if report.is_clean() {
        success("Nothing to repair.");
        return Ok(());
    }

    info(format!("Period keys recomputed: {}", report.keys_fixed));
    info(format!("Spans recomputed:       {}", report.spans_fixed));
    info(format!("State rows removed:     {}", report.state_rows_removed));
    if report.job_restored {
        info("Current job reset to 'default'.");
    }
    success("Repair completed.");
    Ok(())
}
