//! Checkpoint progress engine.
//!
//! Every mutating entry point runs its whole read-modify-write sequence inside
//! one `BEGIN IMMEDIATE` transaction, so concurrent cascades on the same tree
//! are serialized by SQLite's writer lock and a failure part-way through leaves
//! nothing behind.

pub mod cascade;
pub mod framework;
pub mod progress;
pub mod projects;
pub mod sessions;

use rusqlite::Connection;

use crate::db::{checkpoint_repo, project_repo};
use crate::error::NerveError;
use crate::models::{Checkpoint, Principal, Project};

pub use cascade::{set_objective_status, set_step_status, ObjectiveUpdate, StepUpdate};
pub use framework::{load_framework, FrameworkInput};
pub use progress::{checkpoint_detail, list_checkpoints, CheckpointDetail, CheckpointSummary, Progress};
pub use projects::{create_project, list_projects};
pub use sessions::{end_session, list_sessions, start_session, SessionStart};

/// Resolve `slug` for the caller, then the checkpoint by business key.
pub(crate) fn scoped_checkpoint(
    conn: &Connection,
    principal: &Principal,
    slug: &str,
    checkpoint_key: &str,
) -> Result<(Project, Checkpoint), NerveError> {
    let project = project_repo::resolve_project(conn, principal, slug)?;
    let checkpoint = checkpoint_repo::resolve_checkpoint(conn, &project.id, checkpoint_key)?;
    Ok((project, checkpoint))
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rusqlite::Connection;

    use crate::db::connection::open_in_memory;
    use crate::models::Principal;

    use super::framework::{load_framework, FrameworkInput};
    use super::projects::create_project;

    pub fn owner() -> Principal {
        Principal::new("user-1", Some("dev@example.com".into()))
    }

    pub fn t(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    /// Project `site` with CP1 → {OB1: S1, S2} and CP2 → {OB2: S3, OB3: S4}.
    pub fn seeded() -> Connection {
        let conn = open_in_memory().unwrap();
        seed(&conn);
        conn
    }

    pub fn seed(conn: &Connection) {
        create_project(conn, &owner(), "site", Some("Client site"), t(0)).unwrap();
        let framework: FrameworkInput = serde_json::from_value(serde_json::json!({
            "checkpoints": [
                {"checkpointId": "CP1", "phase": 1, "title": "Foundations", "objectives": [
                    {"objectiveId": "OB1", "title": "Schema", "steps": [
                        {"stepId": "S1", "title": "Tables"},
                        {"stepId": "S2", "title": "Indexes"}
                    ]}
                ]},
                {"checkpointId": "CP2", "phase": 2, "title": "Launch", "objectives": [
                    {"objectiveId": "OB2", "title": "Deploy", "steps": [
                        {"stepId": "S3", "title": "Pipeline"}
                    ]},
                    {"objectiveId": "OB3", "title": "Handover", "steps": [
                        {"stepId": "S4", "title": "Docs"}
                    ]}
                ]}
            ]
        }))
        .unwrap();
        load_framework(conn, &owner(), "site", &framework, t(0)).unwrap();
    }
}
