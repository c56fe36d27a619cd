use crate::cli::commands::print_sessions;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::AppContext;
use crate::core::query::PeriodQuery;
use crate::errors::AppResult;
use crate::models::period::PeriodKey;
use crate::ui::messages::{confirm, info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Clear {
        period,
        key,
        all_jobs,
        yes,
    } = cmd
    {
        let mut ctx = AppContext::open(cfg)?;
        let period_key = PeriodKey::parse(*period, key.as_deref())?;
        let sel = PeriodQuery::select(&ctx, *period, period_key, *all_jobs)?;

        if !*yes
            && !confirm(&format!(
                "Are you sure that you want to delete the records for this {} ({})?",
                period, sel.key
            ))
        {
            info("Operation cancelled.");
            return Ok(());
        }

        let deleted = PeriodQuery::clear_period(&mut ctx, *period, period_key, *all_jobs)?;
        info(format!("Deleting {} records...", deleted.len()));
        print_sessions(&ctx, &deleted, false)?;
        success(format!("Deleted {} records.", deleted.len()));
    }

    Ok(())
}
