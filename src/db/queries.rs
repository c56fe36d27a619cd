//! CRUD primitives for jobs, sessions, journal entries and the state row.

use crate::errors::{AppError, AppResult};
use crate::models::job::Job;
use crate::models::journal::Journal;
use crate::models::period::PeriodKind;
use crate::models::session::Clok;
use crate::models::state::ActiveState;
use crate::utils::date::PeriodKeys;
use crate::utils::time::{format_timestamp, parse_timestamp};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const SESSION_COLUMNS: &str =
    "id, job_id, date_key, week_key, month_key, time_in, time_out, time_span";

/// True for UNIQUE / PRIMARY KEY violations (not foreign keys).
pub fn is_duplicate(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, _) => matches!(
            err.extended_code,
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        ),
        _ => false,
    }
}

fn duplicate_or(e: rusqlite::Error, what: impl FnOnce() -> String) -> AppError {
    if is_duplicate(&e) {
        AppError::Duplicate(what())
    } else {
        AppError::Db(e)
    }
}

fn get_timestamp(row: &Row, col: &str) -> Result<NaiveDateTime> {
    let raw: String = row.get(col)?;
    parse_timestamp(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

fn get_optional_timestamp(row: &Row, col: &str) -> Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(col)?;
    raw.map(|s| {
        parse_timestamp(&s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn collect<T>(rows: impl Iterator<Item = Result<T>>) -> AppResult<Vec<T>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Jobs
// ---------------------------

fn map_job(row: &Row) -> Result<Job> {
    Ok(Job {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

/// Insert a job; the name is normalized first.
pub fn insert_job(conn: &Connection, name: &str) -> AppResult<Job> {
    let name = Job::normalize_name(name);
    conn.execute("INSERT INTO time_clok_jobs (name) VALUES (?1)", [&name])
        .map_err(|e| duplicate_or(e, || format!("job '{}'", name)))?;

    Ok(Job {
        id: conn.last_insert_rowid(),
        name,
    })
}

pub fn load_jobs(conn: &Connection) -> AppResult<Vec<Job>> {
    let mut stmt = conn.prepare("SELECT id, name FROM time_clok_jobs ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_job)?;
    collect(rows)
}

pub fn find_job_by_name(conn: &Connection, name: &str) -> AppResult<Option<Job>> {
    let job = conn
        .query_row(
            "SELECT id, name FROM time_clok_jobs WHERE name = ?1",
            [Job::normalize_name(name)],
            map_job,
        )
        .optional()?;
    Ok(job)
}

pub fn find_job_by_id(conn: &Connection, id: i64) -> AppResult<Option<Job>> {
    let job = conn
        .query_row(
            "SELECT id, name FROM time_clok_jobs WHERE id = ?1",
            [id],
            map_job,
        )
        .optional()?;
    Ok(job)
}

// ---------------------------
// Sessions
// ---------------------------

pub fn map_session(row: &Row) -> Result<Clok> {
    let keys = PeriodKeys {
        date_key: row.get("date_key")?,
        week_key: row.get("week_key")?,
        month_key: row.get("month_key")?,
    };

    Ok(Clok::from_stored(
        row.get("id")?,
        row.get("job_id")?,
        get_timestamp(row, "time_in")?,
        get_optional_timestamp(row, "time_out")?,
        row.get("time_span")?,
        keys,
    ))
}

/// Load the sessions selected by `sql` and attach their journal entries.
fn load_sessions_where(
    conn: &Connection,
    clause: &str,
    params: &[&dyn rusqlite::ToSql],
) -> AppResult<Vec<Clok>> {
    let sql = format!("SELECT {} FROM time_clok {}", SESSION_COLUMNS, clause);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, map_session)?;
    let mut sessions = collect(rows)?;

    for s in sessions.iter_mut() {
        s.journal = load_journals_for_session(conn, s.id)?;
    }
    Ok(sessions)
}

/// Insert a session and store its new id back into it.
pub fn insert_session(conn: &Connection, clok: &mut Clok) -> AppResult<()> {
    conn.execute(
        "INSERT INTO time_clok (job_id, date_key, week_key, month_key, time_in, time_out, time_span)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            clok.job_id,
            clok.date_key(),
            clok.week_key(),
            clok.month_key(),
            format_timestamp(&clok.time_in()),
            clok.time_out().as_ref().map(format_timestamp),
            clok.time_span(),
        ],
    )
    .map_err(|e| {
        duplicate_or(e, || {
            format!(
                "a session from {} to {}",
                format_timestamp(&clok.time_in()),
                clok.time_out()
                    .as_ref()
                    .map(format_timestamp)
                    .unwrap_or_else(|| "(open)".into())
            )
        })
    })?;

    clok.id = conn.last_insert_rowid();
    Ok(())
}

/// Update a session (all fields except id)
pub fn update_session(conn: &Connection, clok: &Clok) -> AppResult<()> {
    conn.execute(
        "UPDATE time_clok
         SET job_id = ?1, date_key = ?2, week_key = ?3, month_key = ?4,
             time_in = ?5, time_out = ?6, time_span = ?7
         WHERE id = ?8",
        params![
            clok.job_id,
            clok.date_key(),
            clok.week_key(),
            clok.month_key(),
            format_timestamp(&clok.time_in()),
            clok.time_out().as_ref().map(format_timestamp),
            clok.time_span(),
            clok.id,
        ],
    )
    .map_err(|e| duplicate_or(e, || format!("session {} would duplicate another", clok.id)))?;
    Ok(())
}

pub fn load_session(conn: &Connection, id: i64) -> AppResult<Option<Clok>> {
    Ok(load_sessions_where(conn, "WHERE id = ?1", &[&id])?.pop())
}

/// Sessions whose `kind` key equals `key`, optionally for one job, oldest first.
pub fn load_sessions_by_key(
    conn: &Connection,
    kind: PeriodKind,
    key: i64,
    job_id: Option<i64>,
) -> AppResult<Vec<Clok>> {
    match job_id {
        Some(job) => load_sessions_where(
            conn,
            &format!(
                "WHERE {} = ?1 AND job_id = ?2 ORDER BY time_in ASC, id ASC",
                kind.column()
            ),
            &[&key, &job],
        ),
        None => load_sessions_where(
            conn,
            &format!("WHERE {} = ?1 ORDER BY time_in ASC, id ASC", kind.column()),
            &[&key],
        ),
    }
}

/// Most recent session of a job by `time_in`, open or closed.
pub fn latest_session_for_job(conn: &Connection, job_id: i64) -> AppResult<Option<Clok>> {
    Ok(load_sessions_where(
        conn,
        "WHERE job_id = ?1 ORDER BY time_in DESC, id DESC LIMIT 1",
        &[&job_id],
    )?
    .pop())
}

/// Most recent open session of a job.
pub fn open_session_for_job(conn: &Connection, job_id: i64) -> AppResult<Option<Clok>> {
    Ok(load_sessions_where(
        conn,
        "WHERE job_id = ?1 AND time_out IS NULL ORDER BY time_in DESC, id DESC LIMIT 1",
        &[&job_id],
    )?
    .pop())
}

/// A session with exactly these timestamps (`time_out` may be NULL).
pub fn find_session_by_times(
    conn: &Connection,
    time_in: NaiveDateTime,
    time_out: Option<NaiveDateTime>,
) -> AppResult<Option<Clok>> {
    let time_in = format_timestamp(&time_in);
    let time_out = time_out.as_ref().map(format_timestamp);
    Ok(load_sessions_where(
        conn,
        "WHERE time_in = ?1 AND time_out IS ?2 LIMIT 1",
        &[&time_in, &time_out],
    )?
    .pop())
}

pub fn load_all_sessions(conn: &Connection) -> AppResult<Vec<Clok>> {
    load_sessions_where(conn, "ORDER BY id ASC", &[])
}

/// Delete a session; its journal entries go with it (ON DELETE CASCADE).
pub fn delete_session(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM time_clok WHERE id = ?1", [id])?)
}

// ---------------------------
// Journal
// ---------------------------

fn map_journal(row: &Row) -> Result<Journal> {
    Ok(Journal {
        id: row.get("id")?,
        session_id: row.get("session_id")?,
        time: get_timestamp(row, "time")?,
        entry: row.get("entry")?,
    })
}

pub fn insert_journal(
    conn: &Connection,
    session_id: i64,
    time: NaiveDateTime,
    entry: &str,
) -> AppResult<Journal> {
    conn.execute(
        "INSERT INTO time_clok_journal (session_id, time, entry) VALUES (?1, ?2, ?3)",
        params![session_id, format_timestamp(&time), entry],
    )?;

    Ok(Journal {
        id: conn.last_insert_rowid(),
        session_id,
        time,
        entry: entry.to_string(),
    })
}

pub fn load_journals_for_session(conn: &Connection, session_id: i64) -> AppResult<Vec<Journal>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, session_id, time, entry FROM time_clok_journal
         WHERE session_id = ?1
         ORDER BY time ASC, id ASC",
    )?;
    let rows = stmt.query_map([session_id], map_journal)?;
    collect(rows)
}

pub fn load_journal(conn: &Connection, id: i64) -> AppResult<Option<Journal>> {
    let j = conn
        .query_row(
            "SELECT id, session_id, time, entry FROM time_clok_journal WHERE id = ?1",
            [id],
            map_journal,
        )
        .optional()?;
    Ok(j)
}

pub fn load_all_journals(conn: &Connection) -> AppResult<Vec<Journal>> {
    let mut stmt =
        conn.prepare("SELECT id, session_id, time, entry FROM time_clok_journal ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_journal)?;
    collect(rows)
}

pub fn delete_journal(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM time_clok_journal WHERE id = ?1", [id])?)
}

// ---------------------------
// State
// ---------------------------

fn map_state(row: &Row) -> Result<ActiveState> {
    Ok(ActiveState {
        id: row.get("id")?,
        job_id: row.get("job_id")?,
        session_id: row.get("session_id")?,
    })
}

pub fn count_state_rows(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM time_clok_state", [], |row| row.get(0))?)
}

pub fn load_state_rows(conn: &Connection) -> AppResult<Vec<ActiveState>> {
    let mut stmt =
        conn.prepare("SELECT id, job_id, session_id FROM time_clok_state ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_state)?;
    collect(rows)
}

pub fn insert_state(conn: &Connection, job_id: Option<i64>) -> AppResult<ActiveState> {
    conn.execute(
        "INSERT INTO time_clok_state (job_id, session_id) VALUES (?1, NULL)",
        [job_id],
    )?;
    Ok(ActiveState {
        id: conn.last_insert_rowid(),
        job_id,
        session_id: None,
    })
}

pub fn update_state(conn: &Connection, state: &ActiveState) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE time_clok_state SET job_id = ?1, session_id = ?2 WHERE id = ?3",
        params![state.job_id, state.session_id, state.id],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("state row {}", state.id)));
    }
    Ok(())
}

pub fn delete_state(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM time_clok_state WHERE id = ?1", [id])?)
}
