use crate::errors::AppError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

/// One attempt of the fetch cycle, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRun {
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub listings_seen: Option<i64>,
    pub summary: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
}

pub fn start_fetch_run(conn: &Connection, now: DateTime<Utc>) -> Result<i64, AppError> {
    conn.execute(
        "INSERT INTO fetch_runs (started_at, success) VALUES (?1, 0)",
        params![now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn finish_fetch_run(
    conn: &Connection,
    run_id: i64,
    now: DateTime<Utc>,
    listings_seen: usize,
    summary: &str,
) -> Result<(), AppError> {
    conn.execute(
        "UPDATE fetch_runs SET finished_at = ?1, listings_seen = ?2, summary = ?3, success = 1 WHERE id = ?4",
        params![now, listings_seen as i64, summary, run_id],
    )?;
    Ok(())
}

pub fn fail_fetch_run(
    conn: &Connection,
    run_id: i64,
    now: DateTime<Utc>,
    error: &str,
) -> Result<(), AppError> {
    conn.execute(
        "UPDATE fetch_runs SET finished_at = ?1, success = 0, error_message = ?2 WHERE id = ?3",
        params![now, error, run_id],
    )?;
    Ok(())
}

pub fn recent_fetch_runs(conn: &Connection, limit: usize) -> Result<Vec<FetchRun>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, started_at, finished_at, listings_seen, summary, success, error_message
         FROM fetch_runs ORDER BY started_at DESC, id DESC LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit as i64], |row| {
        Ok(FetchRun {
            id: row.get(0)?,
            started_at: row.get(1)?,
            finished_at: row.get(2)?,
            listings_seen: row.get(3)?,
            summary: row.get(4)?,
            success: row.get(5)?,
            error_message: row.get(6)?,
        })
    })?;

    let mut runs = Vec::new();
    for r in rows {
        runs.push(r?);
    }
    Ok(runs)
}
