use crate::cli::commands::print_sessions;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::AppContext;
use crate::core::query::PeriodQuery;
use crate::errors::AppResult;
use crate::models::period::PeriodKey;
use crate::ui::messages::header;
use crate::utils::formatting::{bold, seconds2hours};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show {
        period,
        key,
        all_jobs,
        journal,
    } = cmd
    {
        let ctx = AppContext::open(cfg)?;
        let period_key = PeriodKey::parse(*period, key.as_deref())?;
        let sel = PeriodQuery::select(&ctx, *period, period_key, *all_jobs)?;
        let records = PeriodQuery::get_by_period(&ctx, *period, period_key, *all_jobs)?;

        header(format!("{} {}", period, sel.key));
        print_sessions(&ctx, &records, *journal)?;

        let total = PeriodQuery::total_seconds(&records, ctx.now());
        println!(
            "{}",
            bold(&format!("Total Hours Worked: {:.3}", seconds2hours(total, 3)))
        );
    }

    Ok(())
}
