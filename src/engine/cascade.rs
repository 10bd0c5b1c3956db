use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{checkpoint_repo, objective_repo, session_repo, step_repo, with_immediate_tx};
use crate::error::NerveError;
use crate::models::{Checkpoint, ObjectiveWithSteps, Principal, ProgressStatus, Step};

use super::{scoped_checkpoint, sessions};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepUpdate {
    pub step: Step,
    pub objective_completed: bool,
    pub checkpoint_completed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveUpdate {
    pub objective: ObjectiveWithSteps,
    pub checkpoint_completed: bool,
}

/// Set a step's status and promote its ancestors when they become fully
/// complete. Promotion is upward only: reopening a step never demotes a
/// COMPLETE objective or checkpoint.
#[allow(clippy::too_many_arguments)]
pub fn set_step_status(
    conn: &Connection,
    principal: &Principal,
    slug: &str,
    checkpoint_key: &str,
    objective_key: &str,
    step_key: &str,
    status: ProgressStatus,
    now: DateTime<Utc>,
) -> Result<StepUpdate, NerveError> {
    with_immediate_tx(conn, |conn| {
        let (_, checkpoint) = scoped_checkpoint(conn, principal, slug, checkpoint_key)?;
        let objective = objective_repo::resolve_objective(conn, &checkpoint.id, objective_key)?;
        let step = step_repo::resolve_step(conn, &objective.id, step_key)?;

        step_repo::update_step_status(conn, &step.id, status, now)?;
        tracing::debug!(
            checkpoint = %checkpoint.key,
            objective = %objective.key,
            step = %step.key,
            status = status.as_str(),
            "step status set"
        );

        let steps = step_repo::list_steps(conn, &objective.id)?;
        let mut objective_completed = false;
        let mut checkpoint_completed = false;
        if !objective.status.is_complete() && steps.iter().all(|s| s.status.is_complete()) {
            objective_repo::update_objective_status(conn, &objective.id, ProgressStatus::Complete, now)?;
            objective_completed = true;
            tracing::info!(checkpoint = %checkpoint.key, objective = %objective.key, "objective completed");
            checkpoint_completed = complete_checkpoint_if_done(conn, &checkpoint, now)?;
        }

        Ok(StepUpdate {
            step: step_repo::get_step_by_id(conn, &step.id)?,
            objective_completed,
            checkpoint_completed,
        })
    })
}

/// Set an objective's status directly, without consulting its steps, then
/// re-check the checkpoint.
pub fn set_objective_status(
    conn: &Connection,
    principal: &Principal,
    slug: &str,
    checkpoint_key: &str,
    objective_key: &str,
    status: ProgressStatus,
    now: DateTime<Utc>,
) -> Result<ObjectiveUpdate, NerveError> {
    with_immediate_tx(conn, |conn| {
        let (_, checkpoint) = scoped_checkpoint(conn, principal, slug, checkpoint_key)?;
        let objective = objective_repo::resolve_objective(conn, &checkpoint.id, objective_key)?;

        objective_repo::update_objective_status(conn, &objective.id, status, now)?;
        tracing::debug!(
            checkpoint = %checkpoint.key,
            objective = %objective.key,
            status = status.as_str(),
            "objective status set"
        );

        let checkpoint_completed = complete_checkpoint_if_done(conn, &checkpoint, now)?;

        Ok(ObjectiveUpdate {
            objective: ObjectiveWithSteps {
                objective: objective_repo::get_objective_by_id(conn, &objective.id)?,
                steps: step_repo::list_steps(conn, &objective.id)?,
            },
            checkpoint_completed,
        })
    })
}

/// Close `checkpoint` if every objective is COMPLETE and it is not already.
/// Returns whether it was closed by this call.
fn complete_checkpoint_if_done(
    conn: &Connection,
    checkpoint: &Checkpoint,
    now: DateTime<Utc>,
) -> Result<bool, NerveError> {
    if checkpoint.status.is_complete() {
        return Ok(false);
    }
    let objectives = objective_repo::list_objectives(conn, &checkpoint.id)?;
    if !objectives.iter().all(|o| o.status.is_complete()) {
        return Ok(false);
    }
    close_checkpoint(conn, checkpoint, now)?;
    Ok(true)
}

/// Stop the running session (if any), re-sum session time and mark the
/// checkpoint COMPLETE.
fn close_checkpoint(
    conn: &Connection,
    checkpoint: &Checkpoint,
    now: DateTime<Utc>,
) -> Result<(), NerveError> {
    sessions::close_running(conn, &checkpoint.id, None, now)?;
    let actual_mins = session_repo::total_minutes(conn, &checkpoint.id)?;
    checkpoint_repo::mark_complete(conn, &checkpoint.id, actual_mins, now)?;
    tracing::info!(checkpoint = %checkpoint.key, actual_mins, "checkpoint completed");
    Ok(())
}
