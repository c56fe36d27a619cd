//! Bring stored data back in line with its invariants.

use crate::db::log::ttlog_quiet;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::job::DEFAULT_JOB;
use chrono::NaiveDateTime;
use rusqlite::Connection;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Sessions whose period keys did not match `time_in`.
    pub keys_fixed: usize,
    /// Closed sessions whose span did not match `time_out - time_in`.
    pub spans_fixed: usize,
    /// Extra state rows removed.
    pub state_rows_removed: usize,
    /// The state had no job and was pointed back at `default`.
    pub job_restored: bool,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        *self == RepairReport::default()
    }
}

pub struct RepairLogic;

impl RepairLogic {
    /// Works on the bare connection: a broken state row must not prevent the repair.
    pub fn repair(conn: &Connection, now: NaiveDateTime) -> AppResult<RepairReport> {
        let mut report = RepairReport::default();
        let tx = conn.unchecked_transaction()?;

        for mut clok in queries::load_all_sessions(&tx)? {
            let keys_ok = clok.keys_are_current();
            let span_ok = clok.span_is_current();
            if keys_ok && span_ok {
                continue;
            }
            if !keys_ok {
                report.keys_fixed += 1;
            }
            if !span_ok {
                report.spans_fixed += 1;
            }
            clok.recompute();
            queries::update_session(&tx, &clok)?;
        }

        // keep the oldest state row
        let rows = queries::load_state_rows(&tx)?;
        for extra in rows.iter().skip(1) {
            report.state_rows_removed += queries::delete_state(&tx, extra.id)?;
        }

        if let Some(state) = rows.first()
            && state.job_id.is_none()
        {
            let job = match queries::find_job_by_name(&tx, DEFAULT_JOB)? {
                Some(job) => job,
                None => queries::insert_job(&tx, DEFAULT_JOB)?,
            };
            let mut fixed = state.clone();
            fixed.job_id = Some(job.id);
            queries::update_state(&tx, &fixed)?;
            report.job_restored = true;
        }

        tx.commit()?;

        ttlog_quiet(
            conn,
            now,
            "repair",
            "",
            &format!(
                "keys fixed: {}, spans fixed: {}, state rows removed: {}, job restored: {}",
                report.keys_fixed, report.spans_fixed, report.state_rows_removed, report.job_restored
            ),
        );
        Ok(report)
    }
}
