use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::NerveError;
use crate::models::{Objective, ProgressStatus};

const OBJECTIVE_COLUMNS: &str = "id, checkpoint_id, objective_key, title, position, status, updated_at";

pub fn create_objective(
    conn: &Connection,
    id: &str,
    checkpoint_id: &str,
    key: &str,
    title: &str,
    position: i64,
    now: DateTime<Utc>,
) -> Result<(), NerveError> {
    conn.execute(
        "INSERT INTO objectives (id, checkpoint_id, objective_key, title, position, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, checkpoint_id, key, title, position, now],
    )?;
    Ok(())
}

pub fn get_objective_by_id(conn: &Connection, id: &str) -> Result<Objective, NerveError> {
    conn.query_row(
        &format!("SELECT {OBJECTIVE_COLUMNS} FROM objectives WHERE id = ?1"),
        params![id],
        row_to_objective,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => NerveError::objective_not_found(id),
        _ => NerveError::from(e),
    })
}

/// Resolve an objective by its business key within a checkpoint.
pub fn resolve_objective(
    conn: &Connection,
    checkpoint_id: &str,
    key: &str,
) -> Result<Objective, NerveError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {OBJECTIVE_COLUMNS} FROM objectives WHERE checkpoint_id = ?1 AND objective_key = ?2"
    ))?;
    let mut rows = stmt.query(params![checkpoint_id, key])?;
    match rows.next()? {
        Some(row) => Ok(row_to_objective(row)?),
        None => Err(NerveError::objective_not_found(key)),
    }
}

pub fn list_objectives(conn: &Connection, checkpoint_id: &str) -> Result<Vec<Objective>, NerveError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {OBJECTIVE_COLUMNS} FROM objectives WHERE checkpoint_id = ?1
         ORDER BY position ASC, objective_key ASC"
    ))?;
    let objectives = stmt
        .query_map(params![checkpoint_id], row_to_objective)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(objectives)
}

pub fn update_objective_status(
    conn: &Connection,
    id: &str,
    status: ProgressStatus,
    now: DateTime<Utc>,
) -> Result<(), NerveError> {
    conn.execute(
        "UPDATE objectives SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(())
}

/// Objective counts for a checkpoint: (total, complete).
pub fn objective_counts(conn: &Connection, checkpoint_id: &str) -> Result<(i64, i64), NerveError> {
    let counts = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status = 'COMPLETE' THEN 1 ELSE 0 END), 0)
         FROM objectives WHERE checkpoint_id = ?1",
        params![checkpoint_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(counts)
}

fn row_to_objective(row: &rusqlite::Row) -> rusqlite::Result<Objective> {
    Ok(Objective {
        id: row.get(0)?,
        checkpoint_id: row.get(1)?,
        key: row.get(2)?,
        title: row.get(3)?,
        position: row.get(4)?,
        status: ProgressStatus::from_str(&row.get::<_, String>(5)?).unwrap_or(ProgressStatus::Pending),
        updated_at: row.get(6)?,
    })
}
