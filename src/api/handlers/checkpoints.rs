use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::api::{
    auth::Caller,
    error::ApiResult,
    models::{UpdateObjectiveRequest, UpdateStepRequest},
    routes::AppState,
};
use crate::engine::{self, CheckpointDetail, CheckpointSummary, FrameworkInput};
use crate::models::{Checkpoint, ObjectiveWithSteps, Step};

/// GET /projects/:slug/checkpoints
pub async fn list_checkpoints(
    State(app_state): State<AppState>,
    Caller(principal): Caller,
    Path(slug): Path<String>,
) -> ApiResult<Json<Vec<CheckpointSummary>>> {
    let checkpoints = app_state
        .db
        .run(move |conn| engine::list_checkpoints(conn, &principal, &slug))
        .await?;
    Ok(Json(checkpoints))
}

/// POST /projects/:slug/checkpoints
///
/// Seeds a checkpoint tree. All-or-nothing.
pub async fn load_framework(
    State(app_state): State<AppState>,
    Caller(principal): Caller,
    Path(slug): Path<String>,
    payload: Result<Json<FrameworkInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Vec<Checkpoint>>)> {
    let Json(framework) = payload?;
    let created = app_state
        .db
        .run(move |conn| engine::load_framework(conn, &principal, &slug, &framework, Utc::now()))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /projects/:slug/checkpoints/:checkpoint_id
pub async fn get_checkpoint(
    State(app_state): State<AppState>,
    Caller(principal): Caller,
    Path((slug, checkpoint_key)): Path<(String, String)>,
) -> ApiResult<Json<CheckpointDetail>> {
    let detail = app_state
        .db
        .run(move |conn| {
            engine::checkpoint_detail(conn, &principal, &slug, &checkpoint_key, Utc::now())
        })
        .await?;
    Ok(Json(detail))
}

/// PATCH /projects/:slug/checkpoints/:checkpoint_id/objectives
pub async fn update_objective(
    State(app_state): State<AppState>,
    Caller(principal): Caller,
    Path((slug, checkpoint_key)): Path<(String, String)>,
    payload: Result<Json<UpdateObjectiveRequest>, JsonRejection>,
) -> ApiResult<Json<ObjectiveWithSteps>> {
    let Json(req) = payload?;
    let (objective_key, status) = req.validate()?;

    let update = app_state
        .db
        .run(move |conn| {
            engine::set_objective_status(
                conn,
                &principal,
                &slug,
                &checkpoint_key,
                &objective_key,
                status,
                Utc::now(),
            )
        })
        .await?;
    Ok(Json(update.objective))
}

/// PATCH /projects/:slug/checkpoints/:checkpoint_id/steps
pub async fn update_step(
    State(app_state): State<AppState>,
    Caller(principal): Caller,
    Path((slug, checkpoint_key)): Path<(String, String)>,
    payload: Result<Json<UpdateStepRequest>, JsonRejection>,
) -> ApiResult<Json<Step>> {
    let Json(req) = payload?;
    let (objective_key, step_key, status) = req.validate()?;

    let update = app_state
        .db
        .run(move |conn| {
            engine::set_step_status(
                conn,
                &principal,
                &slug,
                &checkpoint_key,
                &objective_key,
                &step_key,
                status,
                Utc::now(),
            )
        })
        .await?;
    Ok(Json(update.step))
}
