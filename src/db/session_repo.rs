use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::NerveError;
use crate::models::Session;

const SESSION_COLUMNS: &str = "id, checkpoint_id, started_at, ended_at, duration_mins, notes";

pub fn create_session(
    conn: &Connection,
    id: &str,
    checkpoint_id: &str,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Session, NerveError> {
    conn.execute(
        "INSERT INTO sessions (id, checkpoint_id, started_at, notes) VALUES (?1, ?2, ?3, ?4)",
        params![id, checkpoint_id, now, notes],
    )?;
    get_session_by_id(conn, id)
}

pub fn get_session_by_id(conn: &Connection, id: &str) -> Result<Session, NerveError> {
    conn.query_row(
        &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1"),
        params![id],
        row_to_session,
    )
    .map_err(NerveError::from)
}

/// The running session of a checkpoint, if any.
pub fn open_session(conn: &Connection, checkpoint_id: &str) -> Result<Option<Session>, NerveError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SESSION_COLUMNS} FROM sessions
         WHERE checkpoint_id = ?1 AND ended_at IS NULL
         ORDER BY started_at DESC, id DESC
         LIMIT 1"
    ))?;
    let mut rows = stmt.query(params![checkpoint_id])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_session(row)?)),
        None => Ok(None),
    }
}

/// Sessions of a checkpoint, newest first.
pub fn list_sessions(conn: &Connection, checkpoint_id: &str) -> Result<Vec<Session>, NerveError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SESSION_COLUMNS} FROM sessions WHERE checkpoint_id = ?1
         ORDER BY started_at DESC, id DESC"
    ))?;
    let sessions = stmt
        .query_map(params![checkpoint_id], row_to_session)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sessions)
}

/// Close a session. `notes` overwrites the stored notes only when given.
pub fn close_session(
    conn: &Connection,
    id: &str,
    ended_at: DateTime<Utc>,
    duration_mins: i64,
    notes: Option<&str>,
) -> Result<(), NerveError> {
    conn.execute(
        "UPDATE sessions SET ended_at = ?1, duration_mins = ?2, notes = COALESCE(?3, notes)
         WHERE id = ?4",
        params![ended_at, duration_mins, notes, id],
    )?;
    Ok(())
}

/// Sum of `duration_mins` over every session of a checkpoint. Open sessions
/// have no duration yet and contribute nothing.
pub fn total_minutes(conn: &Connection, checkpoint_id: &str) -> Result<i64, NerveError> {
    let total: i64 = conn.query_row(
        "SELECT COALESCE(SUM(duration_mins), 0) FROM sessions WHERE checkpoint_id = ?1",
        params![checkpoint_id],
        |row| row.get(0),
    )?;
    Ok(total)
}

fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        checkpoint_id: row.get(1)?,
        started_at: row.get(2)?,
        ended_at: row.get(3)?,
        duration_mins: row.get(4)?,
        notes: row.get(5)?,
    })
}
