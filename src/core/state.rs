//! Tracks the current job and the current session.
//!
//! The state lives in the single `time_clok_state` row. It is loaded once per
//! invocation into a [`StateTracker`]; every change is written through.

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::job::Job;
use crate::models::session::Clok;
use crate::models::state::ActiveState;
use rusqlite::Connection;

#[derive(Debug, Clone)]
pub struct StateTracker {
    state: ActiveState,
}

impl StateTracker {
    /// Load the singleton row. Zero rows is `NotFound`, more than one breaks the invariant.
    pub fn load(conn: &Connection) -> AppResult<Self> {
        let mut rows = queries::load_state_rows(conn)?;
        match rows.len() {
            0 => Err(AppError::NotFound(
                "state row (run `clok init` first)".into(),
            )),
            1 => Ok(Self {
                state: rows.remove(0),
            }),
            n => Err(AppError::Invariant(format!(
                "expected exactly one state row, found {} (run `clok repair`)",
                n
            ))),
        }
    }

    pub fn state(&self) -> &ActiveState {
        &self.state
    }

    pub fn current_job_id(&self) -> AppResult<i64> {
        self.state
            .job_id
            .ok_or_else(|| AppError::NotFound("current job (use `clok switch <job>`)".into()))
    }

    pub fn current_job(&self, conn: &Connection) -> AppResult<Job> {
        let id = self.current_job_id()?;
        queries::find_job_by_id(conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("job with id {}", id)))
    }

    /// The cached session if set, otherwise the latest session of the current job.
    pub fn current_session(&self, conn: &Connection) -> AppResult<Option<Clok>> {
        if let Some(id) = self.state.session_id
            && let Some(clok) = queries::load_session(conn, id)?
        {
            return Ok(Some(clok));
        }

        match self.state.job_id {
            Some(job_id) => queries::latest_session_for_job(conn, job_id),
            None => Ok(None),
        }
    }

    pub fn set_current_session(&mut self, conn: &Connection, clok: &Clok) -> AppResult<()> {
        self.write(conn, |s| s.session_id = Some(clok.id))
    }

    /// Select a job. A cached session belonging to another job is dropped.
    pub fn set_current_job(&mut self, conn: &Connection, job: &Job) -> AppResult<()> {
        let keep_session = match self.state.session_id {
            Some(id) => queries::load_session(conn, id)?.is_some_and(|c| c.job_id == job.id),
            None => false,
        };

        self.write(conn, |s| {
            s.job_id = Some(job.id);
            if !keep_session {
                s.session_id = None;
            }
        })
    }

    pub fn clear_current_session(&mut self, conn: &Connection) -> AppResult<()> {
        self.write(conn, |s| s.session_id = None)
    }

    /// Forget `session_id` if it is the cached one (used when a session is deleted).
    pub fn forget_session(&mut self, conn: &Connection, session_id: i64) -> AppResult<()> {
        if self.state.session_id == Some(session_id) {
            self.clear_current_session(conn)?;
        }
        Ok(())
    }

    /// Re-read the row; needed after bulk changes that touch it from SQL.
    pub fn reload(&mut self, conn: &Connection) -> AppResult<()> {
        *self = Self::load(conn)?;
        Ok(())
    }

    fn write<F: FnOnce(&mut ActiveState)>(&mut self, conn: &Connection, change: F) -> AppResult<()> {
        let mut next = self.state.clone();
        change(&mut next);
        queries::update_state(conn, &next)?;
        self.state = next;
        Ok(())
    }
}
