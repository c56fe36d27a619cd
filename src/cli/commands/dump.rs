use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::AppContext;
use crate::core::dump::DumpLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use std::path::PathBuf;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Dump { file } = cmd {
        let ctx = AppContext::open(cfg)?;
        let path = match file {
            Some(f) => PathBuf::from(f),
            None => DumpLogic::default_path(ctx.now()),
        };

        info(format!("Dumping the database to > {}", path.display()));
        let dump = DumpLogic::write(&ctx.pool.conn, &path, ctx.now())?;
        success(format!(
            "Dumped {} jobs, {} sessions, {} journal entries.",
            dump.time_clok_jobs.len(),
            dump.time_clok.len(),
            dump.time_clok_journal.len()
        ));
    }

    Ok(())
}
