use crate::core::context::AppContext;
use crate::db::log::ttlog_quiet;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::job::Job;
use crate::models::session::Clok;
use chrono::NaiveDateTime;
use rusqlite::Connection;

/// Result of a job switch.
#[derive(Debug, Clone)]
pub struct SwitchOutcome {
    pub job: Job,
    /// Session of the previous job that was closed on the way out.
    pub closed: Option<Clok>,
    pub created: bool,
}

pub struct JobRegistry;

impl JobRegistry {
    /// Create a job. Names are lowercased; an existing name is `Duplicate`.
    pub fn create(conn: &Connection, name: &str, now: NaiveDateTime) -> AppResult<Job> {
        let normalized = Job::normalize_name(name);
        if normalized.is_empty() {
            return Err(AppError::Parse("job name cannot be empty".into()));
        }

        let job = queries::insert_job(conn, &normalized)?;
        ttlog_quiet(conn, now, "job", &job.name, &format!("Created job {}", job.id));
        Ok(job)
    }

    pub fn list(conn: &Connection) -> AppResult<Vec<Job>> {
        queries::load_jobs(conn)
    }

    pub fn get_by_name(conn: &Connection, name: &str) -> AppResult<Job> {
        queries::find_job_by_name(conn, name)?
            .ok_or_else(|| AppError::NotFound(format!("job '{}'", Job::normalize_name(name))))
    }

    /// Make `name` the current job. An open session of the outgoing job is
    /// clocked out at now first. With `create_missing`, an unknown name is created.
    pub fn switch_to(
        ctx: &mut AppContext,
        name: &str,
        create_missing: bool,
    ) -> AppResult<SwitchOutcome> {
        let (job, created) = match queries::find_job_by_name(&ctx.pool.conn, name)? {
            Some(job) => (job, false),
            None if create_missing => (Self::create(&ctx.pool.conn, name, ctx.now())?, true),
            None => {
                return Err(AppError::NotFound(format!(
                    "job '{}'",
                    Job::normalize_name(name)
                )));
            }
        };

        let current = ctx.state.state().job_id;
        if current == Some(job.id) {
            return Ok(SwitchOutcome {
                job,
                closed: None,
                created,
            });
        }

        let mut closed = None;
        if let Some(prev_id) = current
            && let Some(mut open) = queries::open_session_for_job(&ctx.pool.conn, prev_id)?
        {
            open.close(ctx.now());
            queries::update_session(&ctx.pool.conn, &open)?;
            closed = Some(open);
        }

        ctx.state.set_current_job(&ctx.pool.conn, &job)?;

        ttlog_quiet(
            &ctx.pool.conn,
            ctx.now(),
            "switch",
            &job.name,
            &match &closed {
                Some(c) => format!("Switched job; closed session {}", c.id),
                None => "Switched job".to_string(),
            },
        );

        Ok(SwitchOutcome {
            job,
            closed,
            created,
        })
    }
}
