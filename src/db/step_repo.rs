use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::NerveError;
use crate::models::{ProgressStatus, Step};

const STEP_COLUMNS: &str = "id, objective_id, step_key, title, position, status, completed_at, updated_at";

pub fn create_step(
    conn: &Connection,
    id: &str,
    objective_id: &str,
    key: &str,
    title: &str,
    position: i64,
    now: DateTime<Utc>,
) -> Result<(), NerveError> {
    conn.execute(
        "INSERT INTO steps (id, objective_id, step_key, title, position, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, objective_id, key, title, position, now],
    )?;
    Ok(())
}

pub fn get_step_by_id(conn: &Connection, id: &str) -> Result<Step, NerveError> {
    conn.query_row(
        &format!("SELECT {STEP_COLUMNS} FROM steps WHERE id = ?1"),
        params![id],
        row_to_step,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => NerveError::step_not_found(id),
        _ => NerveError::from(e),
    })
}

/// Resolve a step by its business key within an objective.
pub fn resolve_step(conn: &Connection, objective_id: &str, key: &str) -> Result<Step, NerveError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {STEP_COLUMNS} FROM steps WHERE objective_id = ?1 AND step_key = ?2"
    ))?;
    let mut rows = stmt.query(params![objective_id, key])?;
    match rows.next()? {
        Some(row) => Ok(row_to_step(row)?),
        None => Err(NerveError::step_not_found(key)),
    }
}

pub fn list_steps(conn: &Connection, objective_id: &str) -> Result<Vec<Step>, NerveError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {STEP_COLUMNS} FROM steps WHERE objective_id = ?1 ORDER BY position ASC, step_key ASC"
    ))?;
    let steps = stmt
        .query_map(params![objective_id], row_to_step)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(steps)
}

/// Write a step status. `completed_at` follows the status: `now` on COMPLETE
/// (including repeats), NULL otherwise.
pub fn update_step_status(
    conn: &Connection,
    id: &str,
    status: ProgressStatus,
    now: DateTime<Utc>,
) -> Result<(), NerveError> {
    let completed_at = status.is_complete().then_some(now);
    conn.execute(
        "UPDATE steps SET status = ?1, completed_at = ?2, updated_at = ?3 WHERE id = ?4",
        params![status.as_str(), completed_at, now, id],
    )?;
    Ok(())
}

/// Step counts across every objective of a checkpoint: (total, complete).
pub fn step_counts_for_checkpoint(
    conn: &Connection,
    checkpoint_id: &str,
) -> Result<(i64, i64), NerveError> {
    let counts = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(CASE WHEN s.status = 'COMPLETE' THEN 1 ELSE 0 END), 0)
         FROM steps s
         JOIN objectives o ON s.objective_id = o.id
         WHERE o.checkpoint_id = ?1",
        params![checkpoint_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(counts)
}

fn row_to_step(row: &rusqlite::Row) -> rusqlite::Result<Step> {
    Ok(Step {
        id: row.get(0)?,
        objective_id: row.get(1)?,
        key: row.get(2)?,
        title: row.get(3)?,
        position: row.get(4)?,
        status: ProgressStatus::from_str(&row.get::<_, String>(5)?).unwrap_or(ProgressStatus::Pending),
        completed_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
