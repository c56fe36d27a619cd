use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::AppContext;
use crate::core::jobs::JobRegistry;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Jobs { add } = cmd {
        let ctx = AppContext::open(cfg)?;

        if let Some(name) = add {
            let job = JobRegistry::create(&ctx.pool.conn, name, ctx.now())?;
            success(format!("Created job '{}' (id {})", job.name, job.id));
        }

        let current = ctx.state.state().job_id;
        println!("{:<2} {:<6} Job Name", "", "ID");
        for job in JobRegistry::list(&ctx.pool.conn)? {
            let marker = if Some(job.id) == current { "*" } else { "" };
            println!("{:<2} {:<6} {}", marker, job.id, job.name);
        }
    }

    Ok(())
}
