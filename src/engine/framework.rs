use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Deserialize;

use crate::db::{checkpoint_repo, objective_repo, project_repo, step_repo, with_immediate_tx};
use crate::error::NerveError;
use crate::models::{Checkpoint, Principal};

/// A checkpoint tree as authored for a project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkInput {
    pub checkpoints: Vec<CheckpointInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointInput {
    pub checkpoint_id: String,
    pub phase: Option<i64>,
    pub title: Option<String>,
    pub estimated_mins: Option<i64>,
    #[serde(default)]
    pub objectives: Vec<ObjectiveInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveInput {
    pub objective_id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInput {
    pub step_id: String,
    pub title: Option<String>,
}

impl FrameworkInput {
    /// Structural checks that need no database: keys present and unique
    /// under their parent.
    pub fn validate(&self) -> Result<(), NerveError> {
        if self.checkpoints.is_empty() {
            return Err(NerveError::validation("At least one checkpoint is required"));
        }

        let mut checkpoint_keys = HashSet::new();
        for cp in &self.checkpoints {
            if cp.checkpoint_id.trim().is_empty() {
                return Err(NerveError::validation("checkpointId is required"));
            }
            if !checkpoint_keys.insert(cp.checkpoint_id.as_str()) {
                return Err(NerveError::validation(format!(
                    "Duplicate checkpointId: {}",
                    cp.checkpoint_id
                )));
            }
            if is_blank(cp.title.as_deref()) {
                return Err(NerveError::validation(format!(
                    "Checkpoint '{}' has empty title",
                    cp.checkpoint_id
                )));
            }
            if matches!(cp.estimated_mins, Some(m) if m < 0) {
                return Err(NerveError::validation(format!(
                    "Checkpoint '{}' has negative estimatedMins",
                    cp.checkpoint_id
                )));
            }

            let mut objective_keys = HashSet::new();
            for ob in &cp.objectives {
                if ob.objective_id.trim().is_empty() {
                    return Err(NerveError::validation(format!(
                        "Checkpoint '{}' has an objective without objectiveId",
                        cp.checkpoint_id
                    )));
                }
                if !objective_keys.insert(ob.objective_id.as_str()) {
                    return Err(NerveError::validation(format!(
                        "Duplicate objectiveId '{}' in checkpoint '{}'",
                        ob.objective_id, cp.checkpoint_id
                    )));
                }
                if is_blank(ob.title.as_deref()) {
                    return Err(NerveError::validation(format!(
                        "Objective '{}' has empty title",
                        ob.objective_id
                    )));
                }

                let mut step_keys = HashSet::new();
                for step in &ob.steps {
                    if step.step_id.trim().is_empty() {
                        return Err(NerveError::validation(format!(
                            "Objective '{}' has a step without stepId",
                            ob.objective_id
                        )));
                    }
                    if !step_keys.insert(step.step_id.as_str()) {
                        return Err(NerveError::validation(format!(
                            "Duplicate stepId '{}' in objective '{}'",
                            step.step_id, ob.objective_id
                        )));
                    }
                    if is_blank(step.title.as_deref()) {
                        return Err(NerveError::validation(format!(
                            "Step '{}' has empty title",
                            step.step_id
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// An absent title falls back to the key; a present one must say something.
fn is_blank(title: Option<&str>) -> bool {
    matches!(title, Some(t) if t.trim().is_empty())
}

/// Insert a whole checkpoint tree into a project, all-or-nothing. Every node
/// starts PENDING. Missing titles fall back to the business key and a missing
/// phase to the checkpoint's position in the payload.
pub fn load_framework(
    conn: &Connection,
    principal: &Principal,
    slug: &str,
    input: &FrameworkInput,
    now: DateTime<Utc>,
) -> Result<Vec<Checkpoint>, NerveError> {
    input.validate()?;

    with_immediate_tx(conn, |conn| {
        let project = project_repo::resolve_project(conn, principal, slug)?;

        for cp in &input.checkpoints {
            if checkpoint_repo::find_checkpoint(conn, &project.id, &cp.checkpoint_id)?.is_some() {
                return Err(NerveError::conflict(format!(
                    "Checkpoint '{}' already exists in project '{}'",
                    cp.checkpoint_id, project.slug
                )));
            }
        }

        let mut created = Vec::with_capacity(input.checkpoints.len());
        for (i, cp) in input.checkpoints.iter().enumerate() {
            let checkpoint_id = ulid::Ulid::new().to_string();
            let checkpoint = checkpoint_repo::create_checkpoint(
                conn,
                &checkpoint_id,
                &project.id,
                &cp.checkpoint_id,
                cp.phase.unwrap_or(i as i64 + 1),
                cp.title.as_deref().unwrap_or(&cp.checkpoint_id),
                cp.estimated_mins,
                now,
            )?;

            for (j, ob) in cp.objectives.iter().enumerate() {
                let objective_id = ulid::Ulid::new().to_string();
                objective_repo::create_objective(
                    conn,
                    &objective_id,
                    &checkpoint_id,
                    &ob.objective_id,
                    ob.title.as_deref().unwrap_or(&ob.objective_id),
                    j as i64,
                    now,
                )?;

                for (k, step) in ob.steps.iter().enumerate() {
                    step_repo::create_step(
                        conn,
                        &ulid::Ulid::new().to_string(),
                        &objective_id,
                        &step.step_id,
                        step.title.as_deref().unwrap_or(&step.step_id),
                        k as i64,
                        now,
                    )?;
                }
            }
            created.push(checkpoint);
        }

        tracing::info!(project = %project.slug, checkpoints = created.len(), "framework loaded");
        Ok(created)
    })
}
