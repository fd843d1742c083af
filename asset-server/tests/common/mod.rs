//! Helpers shared by the integration tests

#![allow(dead_code)]

use asset_server::db::DbService;
use asset_server::{Config, ServerState};
use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

/// A server state over a fresh SQLite file; keep the `TempDir` alive for the test
pub async fn test_state() -> (ServerState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.db");
    let config = Config::from_lookup(|_| None)
        .unwrap()
        .with_database_path(path.to_string_lossy().into_owned());
    let state = ServerState::initialize(&config).await.unwrap();
    (state, dir)
}

/// Same database wiring, audit store replaced
pub async fn test_db() -> (Config, DbService, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.db");
    let config = Config::from_lookup(|_| None)
        .unwrap()
        .with_database_path(path.to_string_lossy().into_owned());
    let db = DbService::new(&config.database_path).await.unwrap();
    (config, db, dir)
}

pub fn app(state: &ServerState) -> Router {
    asset_server::api::build_app(state).with_state(state.clone())
}

/// Send one request and decode the JSON body (`Value::Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    actor: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header("x-actor", actor);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn create_category(app: &Router, name: &str) -> i64 {
    let (status, body) = send(app, Method::POST, "/api/categories", Some(json!({ "name": name })), None).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

pub async fn create_location(app: &Router, code: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/locations",
        Some(json!({ "code": code, "name": format!("Room {code}") })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

pub async fn create_asset(app: &Router, code: &str, category_id: i64, location_id: i64) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/assets",
        Some(json!({
            "code": code,
            "name": format!("Asset {code}"),
            "category_id": category_id,
            "location_id": location_id,
        })),
        Some("alice"),
    )
    .await
}

/// Audit records for one entity, newest first
pub async fn audit_for(app: &Router, entity_type: &str, id: i64) -> Vec<Value> {
    let (status, body) = send(app, Method::GET, &format!("/api/audit-logs/{entity_type}/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"].as_array().cloned().unwrap_or_default()
}
