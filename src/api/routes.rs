//! API route definitions

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::db::Db;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
}

/// Build the complete API router
pub fn create_router(db: Db) -> Router {
    let app_state = AppState { db };

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/:slug/checkpoints",
            get(handlers::list_checkpoints).post(handlers::load_framework),
        )
        .route(
            "/projects/:slug/checkpoints/:checkpoint_id",
            get(handlers::get_checkpoint),
        )
        .route(
            "/projects/:slug/checkpoints/:checkpoint_id/objectives",
            patch(handlers::update_objective),
        )
        .route(
            "/projects/:slug/checkpoints/:checkpoint_id/steps",
            patch(handlers::update_step),
        )
        .route(
            "/projects/:slug/checkpoints/:checkpoint_id/sessions",
            get(handlers::list_sessions)
                .post(handlers::start_session)
                .patch(handlers::end_session),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
