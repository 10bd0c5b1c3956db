use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use nerve::api::create_router;
use nerve::db::Db;

// ─── helpers ───────────────────────────────────────────────────────

fn app() -> Router {
    create_router(Db::in_memory().expect("in-memory db"))
}

async fn call(app: &Router, method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder
            .header("x-nerve-user-id", user)
            .header("x-nerve-user-email", format!("{user}@example.com"));
    }
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn as_alice(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    call(app, method, uri, Some("alice"), body).await
}

/// Router with project `site` holding CP1 {OB1: S1, S2} and CP2 {OB2: S3}.
async fn seeded() -> Router {
    let app = app();
    let (status, _) = as_alice(&app, Method::POST, "/projects", Some(json!({"slug": "site", "name": "Client site"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = as_alice(
        &app,
        Method::POST,
        "/projects/site/checkpoints",
        Some(json!({"checkpoints": [
            {"checkpointId": "CP1", "phase": 1, "title": "Discovery", "objectives": [
                {"objectiveId": "OB1", "steps": [{"stepId": "S1"}, {"stepId": "S2"}]}
            ]},
            {"checkpointId": "CP2", "phase": 2, "objectives": [
                {"objectiveId": "OB2", "steps": [{"stepId": "S3"}]}
            ]}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    app
}

// ─── health / auth ─────────────────────────────────────────────────

#[tokio::test]
async fn health_needs_no_identity() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn missing_identity_is_401() {
    let app = seeded().await;
    let (status, body) = call(&app, Method::GET, "/projects/site/checkpoints/CP1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn foreign_project_is_404() {
    let app = seeded().await;
    let (status, body) = call(&app, Method::GET, "/projects/site/checkpoints/CP1", Some("mallory"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PROJECT_NOT_FOUND");

    let (status, _) = call(
        &app,
        Method::PATCH,
        "/projects/site/checkpoints/CP1/steps",
        Some("mallory"),
        Some(json!({"objectiveId": "OB1", "stepId": "S1", "status": "COMPLETE"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── projects / checkpoints ────────────────────────────────────────

#[tokio::test]
async fn projects_are_listed_per_owner() {
    let app = seeded().await;
    let (status, body) = as_alice(&app, Method::GET, "/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["ownerEmail"], "alice@example.com");

    let (_, body) = call(&app, Method::GET, "/projects", Some("bob"), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_project_is_409_and_bad_slug_400() {
    let app = seeded().await;
    let (status, body) = as_alice(&app, Method::POST, "/projects", Some(json!({"slug": "site"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, _) = as_alice(&app, Method::POST, "/projects", Some(json!({"slug": "-nope"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = as_alice(&app, Method::POST, "/projects", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "slug is required");
}

#[tokio::test]
async fn checkpoint_detail_and_list() {
    let app = seeded().await;
    let (status, body) = as_alice(&app, Method::GET, "/projects/site/checkpoints", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["checkpointId"], "CP1");
    assert_eq!(body[1]["checkpointId"], "CP2");

    let (status, body) = as_alice(&app, Method::GET, "/projects/site/checkpoints/CP1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Discovery");
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["objectives"][0]["objectiveId"], "OB1");
    assert_eq!(body["objectives"][0]["steps"][1]["stepId"], "S2");
    assert_eq!(body["progress"]["stepsTotal"], 2);

    // Internal parent ids stay off the wire; only business keys are exposed
    assert!(body.get("projectId").is_none());
    assert!(body["objectives"][0].get("checkpointId").is_none());
    assert!(body["objectives"][0]["steps"][0].get("objectiveId").is_none());

    let (status, body) = as_alice(&app, Method::GET, "/projects/site/checkpoints/NOPE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CHECKPOINT_NOT_FOUND");
}

// ─── cascade ───────────────────────────────────────────────────────

#[tokio::test]
async fn step_patch_cascades_to_checkpoint() {
    let app = seeded().await;
    let uri = "/projects/site/checkpoints/CP1/steps";

    let (status, body) = as_alice(&app, Method::PATCH, uri, Some(json!({"objectiveId": "OB1", "stepId": "S1", "status": "COMPLETE"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stepId"], "S1");
    assert_eq!(body["status"], "COMPLETE");
    assert!(body["completedAt"].is_string());

    let (_, cp) = as_alice(&app, Method::GET, "/projects/site/checkpoints/CP1", None).await;
    assert_eq!(cp["status"], "PENDING");
    assert_eq!(cp["progress"]["percentage"], 50.0);

    as_alice(&app, Method::PATCH, uri, Some(json!({"objectiveId": "OB1", "stepId": "S2", "status": "COMPLETE"}))).await;
    let (_, cp) = as_alice(&app, Method::GET, "/projects/site/checkpoints/CP1", None).await;
    assert_eq!(cp["status"], "COMPLETE");
    assert_eq!(cp["objectives"][0]["status"], "COMPLETE");
    assert!(cp["completedAt"].is_string());

    // Reopening a step leaves the ancestors COMPLETE
    let (_, body) = as_alice(&app, Method::PATCH, uri, Some(json!({"objectiveId": "OB1", "stepId": "S2", "status": "PENDING"}))).await;
    assert!(body["completedAt"].is_null());
    let (_, cp) = as_alice(&app, Method::GET, "/projects/site/checkpoints/CP1", None).await;
    assert_eq!(cp["status"], "COMPLETE");
    assert_eq!(cp["objectives"][0]["status"], "COMPLETE");
}

#[tokio::test]
async fn objective_patch_returns_objective_with_steps() {
    let app = seeded().await;
    let (status, body) = as_alice(
        &app,
        Method::PATCH,
        "/projects/site/checkpoints/CP2/objectives",
        Some(json!({"objectiveId": "OB2", "status": "complete"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["objectiveId"], "OB2");
    assert_eq!(body["status"], "COMPLETE");
    assert_eq!(body["steps"][0]["status"], "PENDING");

    let (_, cp) = as_alice(&app, Method::GET, "/projects/site/checkpoints/CP2", None).await;
    assert_eq!(cp["status"], "COMPLETE");
}

#[tokio::test]
async fn patch_validation_errors_are_400() {
    let app = seeded().await;
    let uri = "/projects/site/checkpoints/CP1/steps";

    let (status, body) = as_alice(&app, Method::PATCH, uri, Some(json!({"objectiveId": "OB1", "status": "COMPLETE"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "stepId is required");

    let (status, body) = as_alice(&app, Method::PATCH, uri, Some(json!({"objectiveId": "OB1", "stepId": "S1", "status": "DONE"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid status"));

    let (status, body) = as_alice(&app, Method::PATCH, uri, Some(json!({"objectiveId": "OB1", "stepId": "S3", "status": "COMPLETE"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "STEP_NOT_FOUND");
}

// ─── sessions ──────────────────────────────────────────────────────

#[tokio::test]
async fn session_lifecycle() {
    let app = seeded().await;
    let uri = "/projects/site/checkpoints/CP1/sessions";

    let (status, body) = as_alice(&app, Method::PATCH, uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NO_ACTIVE_SESSION");
    assert_eq!(body["error"], "No active session");

    let (status, first) = as_alice(&app, Method::POST, uri, Some(json!({"notes": "kickoff"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["notes"], "kickoff");
    assert!(first["endedAt"].is_null());

    let (_, cp) = as_alice(&app, Method::GET, "/projects/site/checkpoints/CP1", None).await;
    assert_eq!(cp["status"], "IN_PROGRESS");
    assert_eq!(cp["activeSession"]["id"], first["id"]);

    // Empty body is accepted; the first session is closed implicitly
    let (status, second) = as_alice(&app, Method::POST, uri, None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, list) = as_alice(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], second["id"]);
    assert!(list[1]["endedAt"].is_string());

    let (status, closed) = as_alice(&app, Method::PATCH, uri, Some(json!({"notes": "done for today"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["id"], second["id"]);
    assert_eq!(closed["notes"], "done for today");
    assert_eq!(closed["durationMins"], 0);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = seeded().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/projects/site/checkpoints/CP1/sessions")
        .header("x-nerve-user-id", "alice")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
