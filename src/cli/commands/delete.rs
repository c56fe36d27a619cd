use crate::cli::commands::{journal_lines, print_sessions};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::AppContext;
use crate::core::session::ClockLogic;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{confirm, info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Delete { id, journal, yes } = cmd {
        let mut ctx = AppContext::open(cfg)?;

        if *journal {
            let entry = queries::load_journal(&ctx.pool.conn, *id)?
                .ok_or_else(|| AppError::NotFound(format!("journal entry with id {}", id)))?;
            println!("{}", journal_lines(&entry));
        } else {
            let clok = queries::load_session(&ctx.pool.conn, *id)?
                .ok_or_else(|| AppError::NotFound(format!("session with id {}", id)))?;
            print_sessions(&ctx, std::slice::from_ref(&clok), true)?;
        }

        let what = if *journal { "journal entry" } else { "session" };
        if !*yes
            && !confirm(&format!(
                "Are you sure that you want to delete this {} ({})? This action is irreversible.",
                what, id
            ))
        {
            info("Operation cancelled.");
            return Ok(());
        }

        if *journal {
            ClockLogic::delete_journal(&mut ctx, *id)?;
        } else {
            ClockLogic::delete_session(&mut ctx, *id)?;
        }
        success(format!("Deleted {} {}.", what, id));
    }

    Ok(())
}
