use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if a table exists.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Create jobs, sessions, journal and state tables.
///
/// Timestamps are TEXT `YYYY-MM-DD HH:MM:SS` in local wall-clock time.
fn create_clok_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS time_clok_jobs (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS time_clok (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id     INTEGER NOT NULL REFERENCES time_clok_jobs(id),
            date_key   INTEGER NOT NULL,
            week_key   INTEGER NOT NULL,
            month_key  INTEGER NOT NULL,
            time_in    TEXT NOT NULL,
            time_out   TEXT,
            time_span  INTEGER NOT NULL DEFAULT 0,
            CONSTRAINT clok_natural_key UNIQUE (time_in, time_out)
        );

        CREATE INDEX IF NOT EXISTS idx_clok_date_key  ON time_clok(date_key);
        CREATE INDEX IF NOT EXISTS idx_clok_week_key  ON time_clok(week_key);
        CREATE INDEX IF NOT EXISTS idx_clok_month_key ON time_clok(month_key);
        CREATE INDEX IF NOT EXISTS idx_clok_job_time  ON time_clok(job_id, time_in);

        CREATE TABLE IF NOT EXISTS time_clok_journal (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  INTEGER NOT NULL REFERENCES time_clok(id) ON DELETE CASCADE,
            time        TEXT NOT NULL,
            entry       TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_journal_session ON time_clok_journal(session_id);

        CREATE TABLE IF NOT EXISTS time_clok_state (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id      INTEGER REFERENCES time_clok_jobs(id) ON DELETE SET NULL,
            session_id  INTEGER REFERENCES time_clok(id) ON DELETE SET NULL
        );
        "#,
    )?;
    Ok(())
}

/// Create every table and index. Safe to run on an existing database.
pub fn create_schema(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;
    create_clok_tables(conn)?;
    Ok(())
}
