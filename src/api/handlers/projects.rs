use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::api::{auth::Caller, error::ApiResult, models::CreateProjectRequest, routes::AppState};
use crate::engine;
use crate::models::Project;

/// POST /projects
pub async fn create_project(
    State(app_state): State<AppState>,
    Caller(principal): Caller,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let Json(req) = payload?;
    let (slug, name) = req.validate()?;

    let project = app_state
        .db
        .run(move |conn| engine::create_project(conn, &principal, &slug, name.as_deref(), Utc::now()))
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /projects
pub async fn list_projects(
    State(app_state): State<AppState>,
    Caller(principal): Caller,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = app_state
        .db
        .run(move |conn| engine::list_projects(conn, &principal))
        .await?;
    Ok(Json(projects))
}
