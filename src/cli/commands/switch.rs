use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::AppContext;
use crate::core::jobs::JobRegistry;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::formatting::seconds2readable;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Switch { name, create } = cmd {
        let mut ctx = AppContext::open(cfg)?;
        let outcome = JobRegistry::switch_to(&mut ctx, name, *create)?;

        if outcome.created {
            info(format!("Created job '{}'", outcome.job.name));
        }
        if let Some(closed) = &outcome.closed {
            info(format!(
                "Clocked out of session {} ({})",
                closed.id,
                seconds2readable(closed.time_span())
            ));
        }
        success(format!("Current job: {}", outcome.job.name));
    }

    Ok(())
}
