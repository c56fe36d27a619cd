//! Retrospective queries by day / week / month key.

use crate::core::context::AppContext;
use crate::db::log::ttlog_quiet;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::journal::Journal;
use crate::models::period::{PeriodKey, PeriodKind};
use crate::models::session::Clok;
use chrono::NaiveDateTime;

/// A resolved period selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSelection {
    pub kind: PeriodKind,
    pub key: i64,
    /// `None` means every job.
    pub job_id: Option<i64>,
}

pub struct PeriodQuery;

impl PeriodQuery {
    /// Resolve the key once (`Default` → key of now) and the job scope.
    pub fn select(
        ctx: &AppContext,
        kind: PeriodKind,
        key: PeriodKey,
        all_jobs: bool,
    ) -> AppResult<PeriodSelection> {
        let job_id = if all_jobs {
            None
        } else {
            Some(ctx.state.current_job_id()?)
        };

        Ok(PeriodSelection {
            kind,
            key: key.resolve(kind, ctx.now()),
            job_id,
        })
    }

    /// Sessions in the period, oldest first, with their journal entries.
    pub fn get_by_period(
        ctx: &AppContext,
        kind: PeriodKind,
        key: PeriodKey,
        all_jobs: bool,
    ) -> AppResult<Vec<Clok>> {
        let sel = Self::select(ctx, kind, key, all_jobs)?;
        queries::load_sessions_by_key(&ctx.pool.conn, sel.kind, sel.key, sel.job_id)
    }

    /// Journal entries of the sessions in the period.
    pub fn journals_by_period(
        ctx: &AppContext,
        kind: PeriodKind,
        key: PeriodKey,
        all_jobs: bool,
    ) -> AppResult<Vec<Journal>> {
        Ok(Self::get_by_period(ctx, kind, key, all_jobs)?
            .into_iter()
            .flat_map(|c| c.journal)
            .collect())
    }

    /// Sum of spans; open sessions contribute their live elapsed time.
    pub fn total_seconds(records: &[Clok], now: NaiveDateTime) -> i64 {
        records.iter().map(|c| c.worked_seconds(now)).sum()
    }

    /// Delete every session (and journal entry) in the period. Returns the deleted sessions.
    pub fn clear_period(
        ctx: &mut AppContext,
        kind: PeriodKind,
        key: PeriodKey,
        all_jobs: bool,
    ) -> AppResult<Vec<Clok>> {
        let sel = Self::select(ctx, kind, key, all_jobs)?;
        let records = queries::load_sessions_by_key(&ctx.pool.conn, sel.kind, sel.key, sel.job_id)?;

        let tx = ctx.pool.conn.unchecked_transaction()?;
        for r in &records {
            queries::delete_session(&tx, r.id)?;
        }
        tx.commit()?;
        ctx.state.reload(&ctx.pool.conn)?;

        ttlog_quiet(
            &ctx.pool.conn,
            ctx.now(),
            "clear",
            &format!("{} {}", sel.kind, sel.key),
            &format!("Deleted {} sessions", records.len()),
        );
        Ok(records)
    }
}
