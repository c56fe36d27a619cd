use crate::db::queries;
use crate::db::schema::create_schema;
use crate::errors::AppResult;
use crate::models::job::DEFAULT_JOB;
use rusqlite::Connection;

/// Initialize the database.
/// Creates the schema, then the `default` job and the single state row
/// pointing at it. Running it again on an initialized database is a no-op.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    create_schema(conn)?;

    if queries::count_state_rows(conn)? == 0 {
        let job = match queries::find_job_by_name(conn, DEFAULT_JOB)? {
            Some(job) => job,
            None => queries::insert_job(conn, DEFAULT_JOB)?,
        };
        queries::insert_state(conn, Some(job.id))?;
    }

    Ok(())
}
