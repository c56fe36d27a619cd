//! Clock-in / clock-out state machine and journal entries.
//!
//! A session is Open while `time_out` is unset and Closed afterwards. Each job
//! has at most one open session: `clock_in` refuses to open a second one.

use crate::core::context::AppContext;
use crate::db::log::ttlog_quiet;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::journal::Journal;
use crate::models::session::Clok;
use crate::utils::time::format_timestamp;
use chrono::{Duration, NaiveDateTime};

/// Raised before closing a session that has been open suspiciously long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongSessionWarning {
    pub session_id: i64,
    pub time_in: NaiveDateTime,
    pub open_for: Duration,
}

impl LongSessionWarning {
    pub fn message(&self) -> String {
        format!(
            "Session {} was clocked in at {} ({}h {:02}m ago). Did you forget to clock out?",
            self.session_id,
            format_timestamp(&self.time_in),
            self.open_for.num_hours(),
            self.open_for.num_minutes() % 60
        )
    }
}

pub struct ClockLogic;

impl ClockLogic {
    /// Open a new session for the current job and make it the current session.
    pub fn clock_in(ctx: &mut AppContext, when: NaiveDateTime) -> AppResult<Clok> {
        let job = ctx.state.current_job(&ctx.pool.conn)?;

        if let Some(open) = queries::open_session_for_job(&ctx.pool.conn, job.id)? {
            return Err(AppError::SessionAlreadyOpen(job.name, open.id));
        }

        let mut clok = Clok::open(job.id, when);
        queries::insert_session(&ctx.pool.conn, &mut clok)?;
        ctx.state.set_current_session(&ctx.pool.conn, &clok)?;

        ttlog_quiet(
            &ctx.pool.conn,
            ctx.now(),
            "in",
            &format!("session {}", clok.id),
            &format!("Clocked in to '{}' at {}", job.name, format_timestamp(&when)),
        );
        Ok(clok)
    }

    /// Clock in now minus the configured offset (first clock-in of the day).
    pub fn first_clock_in(ctx: &mut AppContext) -> AppResult<Clok> {
        let when = ctx.now() - ctx.settings.first_clock_in_offset;
        Self::clock_in(ctx, when)
    }

    /// Resolve the session a plain `out` would close; it must still be open.
    pub fn current_open(ctx: &AppContext) -> AppResult<Clok> {
        let clok = ctx
            .state
            .current_session(&ctx.pool.conn)?
            .ok_or_else(|| AppError::NotFound("a session to clock out of".into()))?;

        if !clok.is_open() {
            return Err(AppError::SessionClosed(clok.id));
        }
        Ok(clok)
    }

    /// `Some` when `clok` has been open longer than the configured limit at `now`.
    pub fn long_session_warning(
        ctx: &AppContext,
        clok: &Clok,
        now: NaiveDateTime,
    ) -> Option<LongSessionWarning> {
        let open_for = now - clok.time_in();
        (clok.is_open() && open_for > ctx.settings.long_session).then(|| LongSessionWarning {
            session_id: clok.id,
            time_in: clok.time_in(),
            open_for,
        })
    }

    /// Close the current session at `when`. The session stays current so that
    /// journal entries keep landing on it.
    pub fn clock_out(ctx: &mut AppContext, when: NaiveDateTime) -> AppResult<Clok> {
        let clok = Self::current_open(ctx)?;
        Self::close(ctx, clok, when)
    }

    /// Close an explicit session, regardless of what is current.
    pub fn clock_out_by_id(ctx: &mut AppContext, id: i64, when: NaiveDateTime) -> AppResult<Clok> {
        let clok = queries::load_session(&ctx.pool.conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("session with id {}", id)))?;
        Self::close(ctx, clok, when)
    }

    fn close(ctx: &mut AppContext, mut clok: Clok, when: NaiveDateTime) -> AppResult<Clok> {
        clok.close(when);
        queries::update_session(&ctx.pool.conn, &clok)?;

        ttlog_quiet(
            &ctx.pool.conn,
            ctx.now(),
            "out",
            &format!("session {}", clok.id),
            &format!(
                "Clocked out at {} after {}s",
                format_timestamp(&when),
                clok.time_span()
            ),
        );
        Ok(clok)
    }

    /// Record a finished span for the current job. The state is not touched.
    pub fn create_closed(
        ctx: &mut AppContext,
        time_in: NaiveDateTime,
        time_out: NaiveDateTime,
    ) -> AppResult<Clok> {
        let job_id = ctx.state.current_job_id()?;
        let mut clok = Clok::closed(job_id, time_in, time_out);
        queries::insert_session(&ctx.pool.conn, &mut clok)?;

        ttlog_quiet(
            &ctx.pool.conn,
            ctx.now(),
            "add",
            &format!("session {}", clok.id),
            &format!(
                "Added span {} → {}",
                format_timestamp(&time_in),
                format_timestamp(&time_out)
            ),
        );
        Ok(clok)
    }

    /// Append a journal entry to the current session (open or closed).
    pub fn add_journal(
        ctx: &mut AppContext,
        text: &str,
        when: Option<NaiveDateTime>,
    ) -> AppResult<Journal> {
        let clok = ctx
            .state
            .current_session(&ctx.pool.conn)?
            .ok_or_else(|| AppError::NotFound("a session to attach the journal entry to".into()))?;
        Self::add_journal_to(ctx, clok.id, text, when)
    }

    /// Append a journal entry to an explicit session.
    pub fn add_journal_to(
        ctx: &mut AppContext,
        session_id: i64,
        text: &str,
        when: Option<NaiveDateTime>,
    ) -> AppResult<Journal> {
        if queries::load_session(&ctx.pool.conn, session_id)?.is_none() {
            return Err(AppError::NotFound(format!("session with id {}", session_id)));
        }

        let time = when.unwrap_or_else(|| ctx.now());
        let journal = queries::insert_journal(&ctx.pool.conn, session_id, time, text)?;

        ttlog_quiet(
            &ctx.pool.conn,
            ctx.now(),
            "journal",
            &format!("session {}", session_id),
            &format!("Added journal entry {}", journal.id),
        );
        Ok(journal)
    }

    /// Delete a session and its journal entries.
    pub fn delete_session(ctx: &mut AppContext, id: i64) -> AppResult<Clok> {
        let clok = queries::load_session(&ctx.pool.conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("session with id {}", id)))?;

        queries::delete_session(&ctx.pool.conn, id)?;
        ctx.state.forget_session(&ctx.pool.conn, id)?;

        ttlog_quiet(
            &ctx.pool.conn,
            ctx.now(),
            "del",
            &format!("session {}", id),
            &format!("Deleted session started {}", format_timestamp(&clok.time_in())),
        );
        Ok(clok)
    }

    pub fn delete_journal(ctx: &mut AppContext, id: i64) -> AppResult<Journal> {
        let journal = queries::load_journal(&ctx.pool.conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("journal entry with id {}", id)))?;

        queries::delete_journal(&ctx.pool.conn, id)?;

        ttlog_quiet(
            &ctx.pool.conn,
            ctx.now(),
            "del",
            &format!("journal {}", id),
            "Deleted journal entry",
        );
        Ok(journal)
    }
}
