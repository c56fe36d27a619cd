use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::AppContext;
use crate::core::dump::DumpLogic;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file } = cmd {
        let mut ctx = AppContext::open(cfg)?;
        let report = DumpLogic::import_file(&mut ctx, Path::new(file))?;

        success(format!(
            "Imported {} jobs, {} sessions, {} journal entries.",
            report.jobs_imported, report.sessions_imported, report.journals_imported
        ));

        let skipped = report.jobs_skipped + report.sessions_skipped + report.journals_skipped;
        if skipped > 0 {
            warning(format!(
                "Skipped {} jobs, {} sessions, {} journal entries already present.",
                report.jobs_skipped, report.sessions_skipped, report.journals_skipped
            ));
        }
    }

    Ok(())
}
