use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{checkpoint_repo, objective_repo, project_repo, session_repo, step_repo};
use crate::error::NerveError;
use crate::models::{Checkpoint, ObjectiveWithSteps, Principal, Session};

use super::scoped_checkpoint;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub objectives_total: i64,
    pub objectives_complete: i64,
    pub steps_total: i64,
    pub steps_complete: i64,
    pub percentage: f64,
}

impl Progress {
    fn new(objectives: (i64, i64), steps: (i64, i64)) -> Self {
        let (objectives_total, objectives_complete) = objectives;
        let (steps_total, steps_complete) = steps;
        let percentage = if steps_total > 0 {
            let raw = steps_complete as f64 / steps_total as f64 * 100.0;
            (raw * 10.0).round() / 10.0
        } else {
            0.0
        };
        Self {
            objectives_total,
            objectives_complete,
            steps_total,
            steps_complete,
            percentage,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointSummary {
    #[serde(flatten)]
    pub checkpoint: Checkpoint,
    pub progress: Progress,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    #[serde(flatten)]
    pub session: Session,
    pub elapsed_mins: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointDetail {
    #[serde(flatten)]
    pub checkpoint: Checkpoint,
    pub objectives: Vec<ObjectiveWithSteps>,
    pub active_session: Option<ActiveSession>,
    pub progress: Progress,
}

fn progress_for(conn: &Connection, checkpoint_id: &str) -> Result<Progress, NerveError> {
    Ok(Progress::new(
        objective_repo::objective_counts(conn, checkpoint_id)?,
        step_repo::step_counts_for_checkpoint(conn, checkpoint_id)?,
    ))
}

/// Checkpoints of a project in phase order, each with its progress.
pub fn list_checkpoints(
    conn: &Connection,
    principal: &Principal,
    slug: &str,
) -> Result<Vec<CheckpointSummary>, NerveError> {
    let project = project_repo::resolve_project(conn, principal, slug)?;
    checkpoint_repo::list_checkpoints(conn, &project.id)?
        .into_iter()
        .map(|checkpoint| {
            let progress = progress_for(conn, &checkpoint.id)?;
            Ok(CheckpointSummary { checkpoint, progress })
        })
        .collect()
}

/// The full tree under one checkpoint plus its running session.
pub fn checkpoint_detail(
    conn: &Connection,
    principal: &Principal,
    slug: &str,
    checkpoint_key: &str,
    now: DateTime<Utc>,
) -> Result<CheckpointDetail, NerveError> {
    let (_, checkpoint) = scoped_checkpoint(conn, principal, slug, checkpoint_key)?;

    let objectives = objective_repo::list_objectives(conn, &checkpoint.id)?
        .into_iter()
        .map(|objective| {
            let steps = step_repo::list_steps(conn, &objective.id)?;
            Ok(ObjectiveWithSteps { objective, steps })
        })
        .collect::<Result<Vec<_>, NerveError>>()?;

    let active_session = session_repo::open_session(conn, &checkpoint.id)?.map(|session| {
        let elapsed_mins = session.minutes_until(now);
        ActiveSession { session, elapsed_mins }
    });
    let progress = progress_for(conn, &checkpoint.id)?;

    Ok(CheckpointDetail {
        checkpoint,
        objectives,
        active_session,
        progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{owner, seeded, t};
    use crate::engine::{set_step_status, start_session};
    use crate::models::ProgressStatus;

    #[test]
    fn summaries_are_ordered_by_phase() {
        let conn = seeded();
        let list = list_checkpoints(&conn, &owner(), "site").unwrap();
        let keys: Vec<_> = list.iter().map(|c| c.checkpoint.key.as_str()).collect();
        assert_eq!(keys, vec!["CP1", "CP2"]);
        assert_eq!(list[1].progress.objectives_total, 2);
        assert_eq!(list[1].progress.steps_total, 2);
    }

    #[test]
    fn percentage_counts_completed_steps() {
        let conn = seeded();
        set_step_status(&conn, &owner(), "site", "CP1", "OB1", "S1", ProgressStatus::Complete, t(1)).unwrap();
        let detail = checkpoint_detail(&conn, &owner(), "site", "CP1", t(2)).unwrap();
        assert_eq!(detail.progress.steps_complete, 1);
        assert_eq!(detail.progress.percentage, 50.0);
        assert_eq!(detail.objectives.len(), 1);
        assert_eq!(detail.objectives[0].steps.len(), 2);
    }

    #[test]
    fn detail_reports_running_session() {
        let conn = seeded();
        assert!(checkpoint_detail(&conn, &owner(), "site", "CP1", t(0)).unwrap().active_session.is_none());
        start_session(&conn, &owner(), "site", "CP1", None, t(0)).unwrap();
        let detail = checkpoint_detail(&conn, &owner(), "site", "CP1", t(17)).unwrap();
        assert_eq!(detail.active_session.unwrap().elapsed_mins, 17);
    }

    #[test]
    fn one_decimal_percentage() {
        let p = Progress::new((1, 0), (3, 1));
        assert_eq!(p.percentage, 33.3);
        assert_eq!(Progress::new((0, 0), (0, 0)).percentage, 0.0);
    }
}
