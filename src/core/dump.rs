//! Whole-database JSON dump and import.
//!
//! Timestamps are POSIX epoch seconds of the local wall-clock time. Import
//! remaps ids: a job whose name already exists is merged into the existing
//! job, rows that collide with existing data are skipped and counted. An open
//! session is skipped when its job already has one.

use crate::config::Config;
use crate::core::context::AppContext;
use crate::db::log::ttlog_quiet;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::job::Job;
use crate::models::session::Clok;
use chrono::{Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DUMP_KEYS: [&str; 4] = [
    "time_clok_jobs",
    "time_clok_state",
    "time_clok",
    "time_clok_journal",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateRow {
    pub id: i64,
    pub job_id: Option<i64>,
    pub session_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClokRow {
    pub id: i64,
    pub job_id: i64,
    pub date_key: i64,
    pub week_key: i64,
    pub month_key: i64,
    #[serde(deserialize_with = "epoch::deserialize")]
    pub time_in: i64,
    #[serde(default, deserialize_with = "epoch::deserialize_opt")]
    pub time_out: Option<i64>,
    #[serde(default)]
    pub time_span: i64,
    #[serde(default)]
    pub journals: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalRow {
    pub id: i64,
    pub session_id: i64,
    #[serde(deserialize_with = "epoch::deserialize")]
    pub time: i64,
    pub entry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dump {
    pub time_clok_jobs: Vec<Job>,
    pub time_clok_state: Vec<StateRow>,
    pub time_clok: Vec<ClokRow>,
    pub time_clok_journal: Vec<JournalRow>,
}

/// What an import did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub jobs_imported: usize,
    pub jobs_skipped: usize,
    pub sessions_imported: usize,
    pub sessions_skipped: usize,
    pub journals_imported: usize,
    pub journals_skipped: usize,
    pub state_applied: bool,
}

/// Epoch values may come in as integers or floats.
mod epoch {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        Ok(f64::deserialize(d)?.floor() as i64)
    }

    pub fn deserialize_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.map(|v| v.floor() as i64))
    }
}

pub fn to_epoch(t: &NaiveDateTime) -> i64 {
    Local
        .from_local_datetime(t)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| t.and_utc().timestamp())
}

pub fn from_epoch(secs: i64) -> AppResult<NaiveDateTime> {
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.naive_local())
        .ok_or_else(|| AppError::Parse(format!("invalid epoch timestamp {}", secs)))
}

pub struct DumpLogic;

impl DumpLogic {
    pub fn dump(conn: &rusqlite::Connection) -> AppResult<Dump> {
        let time_clok_jobs = queries::load_jobs(conn)?;

        let time_clok_state = queries::load_state_rows(conn)?
            .into_iter()
            .map(|s| StateRow {
                id: s.id,
                job_id: s.job_id,
                session_id: s.session_id,
            })
            .collect();

        let time_clok = queries::load_all_sessions(conn)?
            .iter()
            .map(|c| ClokRow {
                id: c.id,
                job_id: c.job_id,
                date_key: c.date_key(),
                week_key: c.week_key(),
                month_key: c.month_key(),
                time_in: to_epoch(&c.time_in()),
                time_out: c.time_out().as_ref().map(to_epoch),
                time_span: c.time_span(),
                journals: c.journal.iter().map(|j| j.id).collect(),
            })
            .collect();

        let time_clok_journal = queries::load_all_journals(conn)?
            .into_iter()
            .map(|j| JournalRow {
                id: j.id,
                session_id: j.session_id,
                time: to_epoch(&j.time),
                entry: j.entry,
            })
            .collect();

        Ok(Dump {
            time_clok_jobs,
            time_clok_state,
            time_clok,
            time_clok_journal,
        })
    }

    /// `<config dir>/clok-dump-YYYYmmdd_HHMMSS.json`
    pub fn default_path(now: NaiveDateTime) -> PathBuf {
        Config::config_dir().join(format!("clok-dump-{}.json", now.format("%Y%m%d_%H%M%S")))
    }

    pub fn write(conn: &rusqlite::Connection, path: &Path, now: NaiveDateTime) -> AppResult<Dump> {
        let dump = Self::dump(conn)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string(&dump)?)?;

        ttlog_quiet(
            conn,
            now,
            "dump",
            &path.to_string_lossy(),
            &format!("Dumped {} sessions", dump.time_clok.len()),
        );
        Ok(dump)
    }

    /// Parse a dump, failing fast when a top-level key is missing.
    pub fn parse(json: &str) -> AppResult<Dump> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let obj = value
            .as_object()
            .ok_or_else(|| AppError::Parse("dump must be a JSON object".into()))?;

        for key in DUMP_KEYS {
            if !obj.contains_key(key) {
                return Err(AppError::Parse(format!("dump is missing key '{}'", key)));
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    pub fn import_file(ctx: &mut AppContext, path: &Path) -> AppResult<ImportReport> {
        let json = fs::read_to_string(path)?;
        let dump = Self::parse(&json)?;
        let report = Self::import(ctx, &dump)?;

        ttlog_quiet(
            &ctx.pool.conn,
            ctx.now(),
            "import",
            &path.to_string_lossy(),
            &format!(
                "Imported {} jobs, {} sessions, {} journal entries",
                report.jobs_imported, report.sessions_imported, report.journals_imported
            ),
        );
        Ok(report)
    }

    pub fn import(ctx: &mut AppContext, dump: &Dump) -> AppResult<ImportReport> {
        let mut report = ImportReport::default();
        let mut job_ids: HashMap<i64, i64> = HashMap::new();
        let mut session_ids: HashMap<i64, i64> = HashMap::new();

        let tx = ctx.pool.conn.unchecked_transaction()?;

        for job in &dump.time_clok_jobs {
            if let Some(existing) = queries::find_job_by_name(&tx, &job.name)? {
                job_ids.insert(job.id, existing.id);
                report.jobs_skipped += 1;
                continue;
            }
            match queries::insert_job(&tx, &job.name) {
                Ok(new) => {
                    job_ids.insert(job.id, new.id);
                    report.jobs_imported += 1;
                }
                Err(AppError::Duplicate(_)) => report.jobs_skipped += 1,
                Err(e) => return Err(e),
            }
        }

        for row in &dump.time_clok {
            let Some(&job_id) = job_ids.get(&row.job_id) else {
                report.sessions_skipped += 1;
                continue;
            };

            let time_in = from_epoch(row.time_in)?;
            let mut clok = match row.time_out {
                Some(out) => Clok::closed(job_id, time_in, from_epoch(out)?),
                None => Clok::open(job_id, time_in),
            };

            if queries::find_session_by_times(&tx, clok.time_in(), clok.time_out())?.is_some() {
                report.sessions_skipped += 1;
                continue;
            }

            // a job keeps at most one open session
            if clok.is_open() && queries::open_session_for_job(&tx, job_id)?.is_some() {
                report.sessions_skipped += 1;
                continue;
            }

            match queries::insert_session(&tx, &mut clok) {
                Ok(()) => {
                    session_ids.insert(row.id, clok.id);
                    report.sessions_imported += 1;
                }
                Err(AppError::Duplicate(_)) => report.sessions_skipped += 1,
                Err(e) => return Err(e),
            }
        }

        for row in &dump.time_clok_journal {
            let Some(&session_id) = session_ids.get(&row.session_id) else {
                report.journals_skipped += 1;
                continue;
            };
            queries::insert_journal(&tx, session_id, from_epoch(row.time)?, &row.entry)?;
            report.journals_imported += 1;
        }

        tx.commit()?;

        if let Some(state) = dump.time_clok_state.first()
            && let Some(job_id) = state.job_id.and_then(|id| job_ids.get(&id).copied())
            && let Some(job) = queries::find_job_by_id(&ctx.pool.conn, job_id)?
        {
            ctx.state.set_current_job(&ctx.pool.conn, &job)?;
            if let Some(session_id) = state.session_id.and_then(|id| session_ids.get(&id).copied())
                && let Some(clok) = queries::load_session(&ctx.pool.conn, session_id)?
            {
                ctx.state.set_current_session(&ctx.pool.conn, &clok)?;
            }
            report.state_applied = true;
        }

        Ok(report)
    }
}
