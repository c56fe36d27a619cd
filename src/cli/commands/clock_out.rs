use crate::cli::commands::resolve_time;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::AppContext;
use crate::core::session::ClockLogic;
use crate::errors::AppResult;
use crate::ui::messages::{confirm, info, success};
use crate::utils::formatting::seconds2readable;
use crate::utils::time::format_timestamp;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Out {
        when,
        id,
        message,
        yes,
    } = cmd
    {
        let mut ctx = AppContext::open(cfg)?;
        let t_out = resolve_time(&ctx, when.as_ref(), None)?;

        let clok = match id {
            Some(id) => ClockLogic::clock_out_by_id(&mut ctx, *id, t_out)?,
            None => {
                let current = ClockLogic::current_open(&ctx)?;
                let now = ctx.now();

                if let Some(w) = ClockLogic::long_session_warning(&ctx, &current, now)
                    && !*yes
                    && !confirm(&w.message())
                {
                    info("Operation cancelled.");
                    return Ok(());
                }

                ClockLogic::clock_out(&mut ctx, t_out)?
            }
        };

        success(format!(
            "Clocked out of session {} at {} ({})",
            clok.id,
            format_timestamp(&t_out),
            seconds2readable(clok.time_span())
        ));

        if let Some(msg) = message {
            ClockLogic::add_journal_to(&mut ctx, clok.id, msg, None)?;
        }
    }

    Ok(())
}
