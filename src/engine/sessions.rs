use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{checkpoint_repo, session_repo, with_immediate_tx};
use crate::error::NerveError;
use crate::models::{duration_mins, Principal, ProgressStatus, Session};

use super::scoped_checkpoint;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStart {
    pub session: Session,
    /// The session that was still running and got closed by this start.
    pub closed: Option<Session>,
    pub checkpoint_started: bool,
}

/// Start a work session on a checkpoint. A running session is closed first,
/// so at most one session per checkpoint is ever open.
pub fn start_session(
    conn: &Connection,
    principal: &Principal,
    slug: &str,
    checkpoint_key: &str,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<SessionStart, NerveError> {
    with_immediate_tx(conn, |conn| {
        let (_, checkpoint) = scoped_checkpoint(conn, principal, slug, checkpoint_key)?;

        let closed = close_running(conn, &checkpoint.id, None, now)?;
        if closed.is_some() {
            let total = session_repo::total_minutes(conn, &checkpoint.id)?;
            checkpoint_repo::set_actual_mins(conn, &checkpoint.id, total, now)?;
        }

        let id = ulid::Ulid::new().to_string();
        let session = session_repo::create_session(conn, &id, &checkpoint.id, notes, now)?;

        let checkpoint_started = checkpoint.status == ProgressStatus::Pending;
        if checkpoint_started {
            checkpoint_repo::mark_started(conn, &checkpoint.id, now)?;
        }
        tracing::info!(checkpoint = %checkpoint.key, session = %session.id, "session started");

        Ok(SessionStart {
            session,
            closed,
            checkpoint_started,
        })
    })
}

/// Stop the running session and re-sum the checkpoint's actual minutes.
/// Fails without writing anything when no session is open.
pub fn end_session(
    conn: &Connection,
    principal: &Principal,
    slug: &str,
    checkpoint_key: &str,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Session, NerveError> {
    with_immediate_tx(conn, |conn| {
        let (_, checkpoint) = scoped_checkpoint(conn, principal, slug, checkpoint_key)?;
        let closed = close_running(conn, &checkpoint.id, notes, now)?
            .ok_or_else(NerveError::no_active_session)?;

        let total = session_repo::total_minutes(conn, &checkpoint.id)?;
        checkpoint_repo::set_actual_mins(conn, &checkpoint.id, total, now)?;
        tracing::info!(
            checkpoint = %checkpoint.key,
            session = %closed.id,
            duration_mins = closed.duration_mins.unwrap_or(0),
            actual_mins = total,
            "session ended"
        );
        Ok(closed)
    })
}

/// Sessions of a checkpoint, newest first.
pub fn list_sessions(
    conn: &Connection,
    principal: &Principal,
    slug: &str,
    checkpoint_key: &str,
) -> Result<Vec<Session>, NerveError> {
    let (_, checkpoint) = scoped_checkpoint(conn, principal, slug, checkpoint_key)?;
    session_repo::list_sessions(conn, &checkpoint.id)
}

/// Close the open session of a checkpoint, if there is one, and return it as
/// stored after the close. Must run inside the caller's transaction.
pub(crate) fn close_running(
    conn: &Connection,
    checkpoint_id: &str,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<Session>, NerveError> {
    let Some(open) = session_repo::open_session(conn, checkpoint_id)? else {
        return Ok(None);
    };
    let minutes = duration_mins(open.started_at, now);
    session_repo::close_session(conn, &open.id, now, minutes, notes)?;
    Ok(Some(session_repo::get_session_by_id(conn, &open.id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::project_repo::resolve_project;
    use crate::engine::testing::{owner, seeded, t};
    use crate::error::ErrorCode;
    use crate::models::Checkpoint;

    fn cp1(conn: &Connection) -> Checkpoint {
        let project = resolve_project(conn, &owner(), "site").unwrap();
        checkpoint_repo::resolve_checkpoint(conn, &project.id, "CP1").unwrap()
    }

    fn open_count(conn: &Connection, checkpoint_id: &str) -> usize {
        session_repo::list_sessions(conn, checkpoint_id)
            .unwrap()
            .iter()
            .filter(|s| s.is_open())
            .count()
    }

    #[test]
    fn first_session_starts_the_checkpoint_clock() {
        let conn = seeded();
        let started = start_session(&conn, &owner(), "site", "CP1", Some("kickoff"), t(0)).unwrap();
        assert!(started.checkpoint_started);
        assert!(started.closed.is_none());
        assert_eq!(started.session.notes.as_deref(), Some("kickoff"));

        let cp = cp1(&conn);
        assert_eq!(cp.status, ProgressStatus::InProgress);
        assert_eq!(cp.started_at, Some(t(0)));

        end_session(&conn, &owner(), "site", "CP1", None, t(20)).unwrap();
        let again = start_session(&conn, &owner(), "site", "CP1", None, t(60)).unwrap();
        assert!(!again.checkpoint_started);
        assert_eq!(cp1(&conn).started_at, Some(t(0)));
    }

    #[test]
    fn starting_while_running_closes_the_old_session() {
        let conn = seeded();
        start_session(&conn, &owner(), "site", "CP1", None, t(0)).unwrap();
        let second = start_session(&conn, &owner(), "site", "CP1", None, t(25)).unwrap();

        let closed = second.closed.expect("previous session closed");
        assert_eq!(closed.ended_at, Some(t(25)));
        assert_eq!(closed.duration_mins, Some(25));
        assert_eq!(open_count(&conn, &cp1(&conn).id), 1);
        assert_eq!(cp1(&conn).actual_mins, 25);
    }

    #[test]
    fn actual_minutes_track_closed_sessions() {
        let conn = seeded();
        start_session(&conn, &owner(), "site", "CP1", None, t(0)).unwrap();
        end_session(&conn, &owner(), "site", "CP1", None, t(30)).unwrap();
        start_session(&conn, &owner(), "site", "CP1", None, t(100)).unwrap();
        start_session(&conn, &owner(), "site", "CP1", None, t(112)).unwrap();
        end_session(&conn, &owner(), "site", "CP1", Some("wrap up"), t(120)).unwrap();

        let cp = cp1(&conn);
        let sessions = session_repo::list_sessions(&conn, &cp.id).unwrap();
        let sum: i64 = sessions.iter().filter_map(|s| s.duration_mins).sum();
        assert_eq!(sum, 30 + 12 + 8);
        assert_eq!(cp.actual_mins, sum);
        assert_eq!(sessions[0].notes.as_deref(), Some("wrap up"));
    }

    #[test]
    fn end_without_open_session_is_invalid_state() {
        let conn = seeded();
        let before = cp1(&conn);
        let err = end_session(&conn, &owner(), "site", "CP1", Some("x"), t(5)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoActiveSession);

        let after = cp1(&conn);
        assert_eq!(after.updated_at, before.updated_at);
        assert!(session_repo::list_sessions(&conn, &after.id).unwrap().is_empty());
    }

    #[test]
    fn end_keeps_notes_unless_given() {
        let conn = seeded();
        start_session(&conn, &owner(), "site", "CP1", Some("draft"), t(0)).unwrap();
        let closed = end_session(&conn, &owner(), "site", "CP1", None, t(1)).unwrap();
        assert_eq!(closed.notes.as_deref(), Some("draft"));
    }

    #[test]
    fn sessions_list_newest_first() {
        let conn = seeded();
        let a = start_session(&conn, &owner(), "site", "CP1", None, t(0)).unwrap().session;
        let b = start_session(&conn, &owner(), "site", "CP1", None, t(10)).unwrap().session;
        let listed = list_sessions(&conn, &owner(), "site", "CP1").unwrap();
        let ids: Vec<_> = listed.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![b.id.as_str(), a.id.as_str()]);
    }

    #[test]
    fn completed_checkpoint_keeps_its_status_on_new_session() {
        let conn = seeded();
        crate::engine::set_objective_status(&conn, &owner(), "site", "CP1", "OB1", ProgressStatus::Complete, t(1)).unwrap();
        let started = start_session(&conn, &owner(), "site", "CP1", None, t(2)).unwrap();
        assert!(!started.checkpoint_started);
        assert_eq!(cp1(&conn).status, ProgressStatus::Complete);
    }
}
