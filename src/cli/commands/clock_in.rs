use crate::cli::commands::resolve_time;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::AppContext;
use crate::core::session::ClockLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::time::{format_timestamp, is_junction, parse_junction};

/// Clock in, or record a closed span when both ends are known.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::In {
        when,
        out,
        first,
        message,
    } = cmd
    {
        let mut ctx = AppContext::open(cfg)?;

        let clok = match (when, out) {
            (Some(range), None) if is_junction(range) => {
                let (t_in, t_out) = parse_junction(range)?;
                ClockLogic::create_closed(&mut ctx, t_in, t_out)?
            }
            (Some(_), Some(_)) => {
                let t_in = resolve_time(&ctx, when.as_ref(), None)?;
                let t_out = resolve_time(&ctx, out.as_ref(), Some(t_in.date()))?;
                ClockLogic::create_closed(&mut ctx, t_in, t_out)?
            }
            (None, Some(_)) => {
                return Err(AppError::Parse("--out needs --when".into()));
            }
            (Some(_), None) => {
                let t_in = resolve_time(&ctx, when.as_ref(), None)?;
                ClockLogic::clock_in(&mut ctx, t_in)?
            }
            (None, None) if *first => ClockLogic::first_clock_in(&mut ctx)?,
            (None, None) => {
                let now = ctx.now();
                ClockLogic::clock_in(&mut ctx, now)?
            }
        };

        match clok.time_out() {
            Some(t_out) => {
                if t_out < clok.time_in() {
                    warning("Clock-out is before clock-in; the span is negative.");
                }
                success(format!(
                    "Recorded session {} for {}: {} to {}",
                    clok.id,
                    clok.time_in().format("%Y-%m-%d"),
                    clok.time_in().format("%H:%M:%S"),
                    t_out.format("%H:%M:%S")
                ));
            }
            None => success(format!(
                "Clocked in at {} (session {})",
                format_timestamp(&clok.time_in()),
                clok.id
            )),
        }

        if let Some(msg) = message {
            ClockLogic::add_journal_to(&mut ctx, clok.id, msg, None)?;
        }
    }

    Ok(())
}
