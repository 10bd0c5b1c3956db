use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::NerveError;
use crate::models::{Checkpoint, ProgressStatus};

const CHECKPOINT_COLUMNS: &str = "id, project_id, checkpoint_key, phase, title, status, estimated_mins,
     actual_mins, started_at, completed_at, created_at, updated_at";

#[allow(clippy::too_many_arguments)]
pub fn create_checkpoint(
    conn: &Connection,
    id: &str,
    project_id: &str,
    key: &str,
    phase: i64,
    title: &str,
    estimated_mins: Option<i64>,
    now: DateTime<Utc>,
) -> Result<Checkpoint, NerveError> {
    conn.execute(
        "INSERT INTO checkpoints (id, project_id, checkpoint_key, phase, title, estimated_mins, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![id, project_id, key, phase, title, estimated_mins, now],
    )?;
    get_checkpoint_by_id(conn, id)
}

pub fn get_checkpoint_by_id(conn: &Connection, id: &str) -> Result<Checkpoint, NerveError> {
    conn.query_row(
        &format!("SELECT {CHECKPOINT_COLUMNS} FROM checkpoints WHERE id = ?1"),
        params![id],
        row_to_checkpoint,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => NerveError::checkpoint_not_found(id),
        _ => NerveError::from(e),
    })
}

pub fn find_checkpoint(
    conn: &Connection,
    project_id: &str,
    key: &str,
) -> Result<Option<Checkpoint>, NerveError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CHECKPOINT_COLUMNS} FROM checkpoints WHERE project_id = ?1 AND checkpoint_key = ?2"
    ))?;
    let mut rows = stmt.query(params![project_id, key])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_checkpoint(row)?)),
        None => Ok(None),
    }
}

/// Resolve a checkpoint by its business key within a project.
pub fn resolve_checkpoint(
    conn: &Connection,
    project_id: &str,
    key: &str,
) -> Result<Checkpoint, NerveError> {
    find_checkpoint(conn, project_id, key)?.ok_or_else(|| NerveError::checkpoint_not_found(key))
}

pub fn list_checkpoints(conn: &Connection, project_id: &str) -> Result<Vec<Checkpoint>, NerveError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CHECKPOINT_COLUMNS} FROM checkpoints WHERE project_id = ?1
         ORDER BY phase ASC, checkpoint_key ASC"
    ))?;
    let checkpoints = stmt
        .query_map(params![project_id], row_to_checkpoint)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(checkpoints)
}

/// PENDING → IN_PROGRESS. `started_at` is only written the first time.
pub fn mark_started(conn: &Connection, id: &str, now: DateTime<Utc>) -> Result<(), NerveError> {
    conn.execute(
        "UPDATE checkpoints SET status = ?1,
         started_at = COALESCE(started_at, ?2),
         updated_at = ?2
         WHERE id = ?3",
        params![ProgressStatus::InProgress.as_str(), now, id],
    )?;
    Ok(())
}

pub fn mark_complete(
    conn: &Connection,
    id: &str,
    actual_mins: i64,
    now: DateTime<Utc>,
) -> Result<(), NerveError> {
    conn.execute(
        "UPDATE checkpoints SET status = ?1, completed_at = ?2, actual_mins = ?3, updated_at = ?2
         WHERE id = ?4",
        params![ProgressStatus::Complete.as_str(), now, actual_mins, id],
    )?;
    Ok(())
}

pub fn set_actual_mins(
    conn: &Connection,
    id: &str,
    actual_mins: i64,
    now: DateTime<Utc>,
) -> Result<(), NerveError> {
    conn.execute(
        "UPDATE checkpoints SET actual_mins = ?1, updated_at = ?2 WHERE id = ?3",
        params![actual_mins, now, id],
    )?;
    Ok(())
}

fn row_to_checkpoint(row: &rusqlite::Row) -> rusqlite::Result<Checkpoint> {
    Ok(Checkpoint {
        id: row.get(0)?,
        project_id: row.get(1)?,
        key: row.get(2)?,
        phase: row.get(3)?,
        title: row.get(4)?,
        status: ProgressStatus::from_str(&row.get::<_, String>(5)?).unwrap_or(ProgressStatus::Pending),
        estimated_mins: row.get(6)?,
        actual_mins: row.get(7)?,
        started_at: row.get(8)?,
        completed_at: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}
