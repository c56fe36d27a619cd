//! SQLite connection wrapper (lightweight for CLI usage).
//!
//! A file-backed database is guarded by an exclusive advisory lock on
//! `<db>.lock`, held for the lifetime of the pool, so that two invocations
//! never interleave their writes.

use crate::errors::AppResult;
use fs4::fs_std::FileExt;
use rusqlite::Connection;
use std::fs::{File, OpenOptions};
use std::path::Path;

pub const IN_MEMORY: &str = ":memory:";

pub struct DbPool {
    pub conn: Connection,
    _lock: Option<File>,
}

impl DbPool {
    pub fn new(path: &str) -> AppResult<Self> {
        if path == IN_MEMORY {
            return Self::in_memory();
        }

        let lock = acquire_lock(path)?;
        let conn = Connection::open(Path::new(path))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn,
            _lock: Some(lock),
        })
    }

    /// Private in-memory database; no lock needed.
    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn, _lock: None })
    }
}

fn acquire_lock(db_path: &str) -> std::io::Result<File> {
    let lock_path = format!("{}.lock", db_path);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)?;
    FileExt::lock_exclusive(&file)?;
    Ok(file)
}
