pub mod clear;
pub mod clock_in;
pub mod clock_out;
pub mod delete;
pub mod dump;
pub mod import;
pub mod init;
pub mod jobs;
pub mod journal;
pub mod log;
pub mod repair;
pub mod show;
pub mod switch;

use crate::core::context::AppContext;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::journal::Journal;
use crate::models::session::Clok;
use crate::utils::table::{Table, session_columns, session_row};
use crate::utils::time::parse_expression;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// Width of wrapped journal text.
const JOURNAL_WIDTH: usize = 64;

/// Parse an optional `--when`-style argument; `None` means now.
pub(crate) fn resolve_time(
    ctx: &AppContext,
    raw: Option<&String>,
    reference: Option<NaiveDate>,
) -> AppResult<NaiveDateTime> {
    let now = ctx.now();
    match raw {
        Some(s) => parse_expression(s, reference, now),
        None => Ok(now),
    }
}

pub(crate) fn journal_lines(j: &Journal) -> String {
    let opts = textwrap::Options::new(JOURNAL_WIDTH)
        .initial_indent("")
        .subsequent_indent("                  ");
    format!(
        "    - ID: {:<6} {} {}",
        j.id,
        j.time.format("%H:%M"),
        textwrap::fill(&j.entry, opts)
    )
}

/// Print sessions as a table, optionally with their journal entries.
pub(crate) fn print_sessions(ctx: &AppContext, records: &[Clok], with_journal: bool) -> AppResult<()> {
    let jobs: HashMap<_, _> = queries::load_jobs(&ctx.pool.conn)?
        .into_iter()
        .map(|j| (j.id, j))
        .collect();
    let now = ctx.now();

    let table = Table::new(session_columns());
    println!("{}", table.header());
    for rec in records {
        println!("{}", table.line(session_row(rec, &jobs, now)));
        if with_journal {
            for j in &rec.journal {
                println!("{}", journal_lines(j));
            }
        }
    }
    Ok(())
}
