use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProgressStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub id: String,
    #[serde(skip)]
    pub project_id: String,
    #[serde(rename = "checkpointId")]
    pub key: String,
    pub phase: i64,
    pub title: String,
    pub status: ProgressStatus,
    pub estimated_mins: Option<i64>,
    pub actual_mins: i64,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: String,
    #[serde(skip)]
    pub checkpoint_id: String,
    #[serde(rename = "objectiveId")]
    pub key: String,
    pub title: String,
    pub position: i64,
    pub status: ProgressStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    #[serde(skip)]
    pub objective_id: String,
    #[serde(rename = "stepId")]
    pub key: String,
    pub title: String,
    pub position: i64,
    pub status: ProgressStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// An objective together with its steps, in position order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveWithSteps {
    #[serde(flatten)]
    pub objective: Objective,
    pub steps: Vec<Step>,
}
