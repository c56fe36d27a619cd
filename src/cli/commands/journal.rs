use crate::cli::commands::{journal_lines, resolve_time};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::AppContext;
use crate::core::query::PeriodQuery;
use crate::core::session::ClockLogic;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::period::PeriodKey;
use crate::ui::messages::{confirm, header, info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Journal {
        message,
        when,
        session,
        delete,
        show,
        period,
        key,
        all_jobs,
        yes,
    } = cmd
    {
        let mut ctx = AppContext::open(cfg)?;

        if let Some(msg) = message {
            let time = resolve_time(&ctx, when.as_ref(), None)?;
            let entry = match session {
                Some(id) => ClockLogic::add_journal_to(&mut ctx, *id, msg, Some(time))?,
                None => ClockLogic::add_journal(&mut ctx, msg, Some(time))?,
            };
            success(format!(
                "Journal entry {} added to session {}",
                entry.id, entry.session_id
            ));
        }

        if *show {
            let period_key = PeriodKey::parse(*period, key.as_deref())?;
            let records = PeriodQuery::get_by_period(&ctx, *period, period_key, *all_jobs)?;
            header(format!(
                "Journal entries for {}",
                key.as_deref().unwrap_or(period.as_str())
            ));
            for rec in records.iter().filter(|r| !r.journal.is_empty()) {
                println!(
                    "Session {} ({})",
                    rec.id,
                    rec.time_in().format("%Y-%m-%d %H:%M")
                );
                for j in &rec.journal {
                    println!("{}", journal_lines(j));
                }
            }
        }

        if let Some(id) = delete {
            let entry = queries::load_journal(&ctx.pool.conn, *id)?
                .ok_or_else(|| AppError::NotFound(format!("journal entry with id {}", id)))?;
            println!("{}", journal_lines(&entry));

            if !*yes
                && !confirm(&format!(
                    "Are you sure that you want to delete this journal entry ({})?",
                    id
                ))
            {
                info("Operation cancelled.");
                return Ok(());
            }
            ClockLogic::delete_journal(&mut ctx, *id)?;
            success(format!("Journal entry {} deleted.", id));
        }
    }

    Ok(())
}
