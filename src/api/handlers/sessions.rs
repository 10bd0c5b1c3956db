use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::api::{
    auth::Caller,
    error::ApiResult,
    models::{optional_body, SessionRequest},
    routes::AppState,
};
use crate::engine;
use crate::models::Session;

/// GET /projects/:slug/checkpoints/:checkpoint_id/sessions
///
/// Newest first.
pub async fn list_sessions(
    State(app_state): State<AppState>,
    Caller(principal): Caller,
    Path((slug, checkpoint_key)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Session>>> {
    let sessions = app_state
        .db
        .run(move |conn| engine::list_sessions(conn, &principal, &slug, &checkpoint_key))
        .await?;
    Ok(Json(sessions))
}

/// POST /projects/:slug/checkpoints/:checkpoint_id/sessions
///
/// Implicitly closes a session that is still running.
pub async fn start_session(
    State(app_state): State<AppState>,
    Caller(principal): Caller,
    Path((slug, checkpoint_key)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Session>)> {
    let req: SessionRequest = optional_body(&body)?;
    let started = app_state
        .db
        .run(move |conn| {
            engine::start_session(
                conn,
                &principal,
                &slug,
                &checkpoint_key,
                req.notes.as_deref(),
                Utc::now(),
            )
        })
        .await?;
    Ok((StatusCode::CREATED, Json(started.session)))
}

/// PATCH /projects/:slug/checkpoints/:checkpoint_id/sessions
///
/// 400 when no session is running.
pub async fn end_session(
    State(app_state): State<AppState>,
    Caller(principal): Caller,
    Path((slug, checkpoint_key)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Json<Session>> {
    let req: SessionRequest = optional_body(&body)?;
    let closed = app_state
        .db
        .run(move |conn| {
            engine::end_session(
                conn,
                &principal,
                &slug,
                &checkpoint_key,
                req.notes.as_deref(),
                Utc::now(),
            )
        })
        .await?;
    Ok(Json(closed))
}
