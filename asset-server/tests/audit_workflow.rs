mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use asset_server::ServerState;
use asset_server::db::repository::{AuditLogStore, RepoError, RepoResult, SqliteAuditLogStore};
use common::{app, audit_for, create_asset, create_category, create_location, send, test_db, test_state};
use http::{Method, StatusCode};
use serde_json::json;
use shared::models::{AuditLog, AuditLogCreate, EntityType};

#[tokio::test]
async fn test_asset_lifecycle_audit_trail() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let category = create_category(&app, "Lab equipment").await;
    let first = create_location(&app, "L1").await;
    let second = create_location(&app, "L2").await;

    let (status, body) = create_asset(&app, "MIC-01", category, first).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let records = audit_for(&app, "asset", id).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["action"], "create");
    let create_record = records[0].clone();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/assets/{id}"),
        Some(json!({ "location_id": second })),
        Some("alice"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let records = audit_for(&app, "asset", id).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["action"], "update");
    assert_eq!(records[0]["actor"], "alice");
    let changes = records[0]["changes"]["changes"].as_array().unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0]["field"], "location_id");
    assert_eq!(changes[0]["from"], first);
    assert_eq!(changes[0]["to"], second);
    // Earlier record untouched
    assert_eq!(records[1], create_record);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/assets/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let records = audit_for(&app, "asset", id).await;
    let actions: Vec<&str> = records.iter().map(|r| r["action"].as_str().unwrap()).collect();
    assert_eq!(actions, ["delete", "update", "create"]);
    assert_eq!(records[0]["changes"]["before"]["code"], "MIC-01");

    let (status, _) = send(&app, Method::GET, &format!("/api/assets/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_code_is_storage_error_without_audit() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let category = create_category(&app, "Vehicles").await;
    let location = create_location(&app, "GARAGE").await;

    let (status, _) = create_asset(&app, "CAR-1", category, location).await;
    assert_eq!(status, StatusCode::CREATED);
    let before = state.audit.list_recent(Some(500)).await.unwrap().len();

    let (status, body) = create_asset(&app, "CAR-1", category, location).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 9002);

    assert_eq!(state.audit.list_recent(Some(500)).await.unwrap().len(), before);
    let (_, body) = send(&app, Method::GET, "/api/assets", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

struct BrokenAuditStore;

#[async_trait]
impl AuditLogStore for BrokenAuditStore {
    async fn append(&self, _record: AuditLogCreate) -> RepoResult<i64> {
        Err(RepoError::Database("audit disk full".into()))
    }

    async fn list_by_entity(&self, _entity_type: EntityType, _entity_id: i64) -> RepoResult<Vec<AuditLog>> {
        Ok(Vec::new())
    }

    async fn list_recent(&self, _limit: i64) -> RepoResult<Vec<AuditLog>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_audit_failure_keeps_committed_mutation() {
    let (config, db, _dir) = test_db().await;
    let state = ServerState::with_audit_store(config, db, Arc::new(BrokenAuditStore));
    let app = app(&state);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/locations",
        Some(json!({ "code": "WH", "name": "Warehouse" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/locations/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Warehouse");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/locations/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["code"], "WH");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_are_attributed() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let category = create_category(&app, "Chairs").await;
    let location = create_location(&app, "HALL").await;

    let mut ids = Vec::new();
    for i in 0..8 {
        let (status, body) = create_asset(&app, &format!("CH-{i}"), category, location).await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let mut handles = Vec::new();
    for (i, id) in ids.iter().copied().enumerate() {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let actor = format!("worker-{i}");
            let (status, _) = send(
                &app,
                Method::PUT,
                &format!("/api/assets/{id}"),
                Some(json!({ "notes": format!("checked by {actor}") })),
                Some(&actor),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for (i, id) in ids.iter().copied().enumerate() {
        let records = audit_for(&app, "asset", id).await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["action"], "update");
        assert_eq!(records[0]["entity_id"], id);
        assert_eq!(records[0]["actor"], format!("worker-{i}"));
        assert_eq!(records[0]["changes"]["after"]["notes"], format!("checked by worker-{i}"));
    }
}

/// SQLite audit store that waits before every write
struct SlowAuditStore {
    inner: SqliteAuditLogStore,
    delay: Duration,
}

#[async_trait]
impl AuditLogStore for SlowAuditStore {
    async fn append(&self, record: AuditLogCreate) -> RepoResult<i64> {
        tokio::time::sleep(self.delay).await;
        self.inner.append(record).await
    }

    async fn list_by_entity(&self, entity_type: EntityType, entity_id: i64) -> RepoResult<Vec<AuditLog>> {
        self.inner.list_by_entity(entity_type, entity_id).await
    }

    async fn list_recent(&self, limit: i64) -> RepoResult<Vec<AuditLog>> {
        self.inner.list_recent(limit).await
    }
}

#[tokio::test]
async fn test_timed_out_request_still_audits_committed_write() {
    let (mut config, db, _dir) = test_db().await;
    config.request_timeout_ms = 100;
    let store = SlowAuditStore {
        inner: SqliteAuditLogStore::new(db.pool.clone()),
        delay: Duration::from_millis(400),
    };
    let state = ServerState::with_audit_store(config, db, Arc::new(store));
    let app = app(&state);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/locations",
        Some(json!({ "code": "SLOW", "name": "Slow room" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

    tokio::time::sleep(Duration::from_millis(800)).await;
    let (_, body) = send(&app, Method::GET, "/api/locations", None, None).await;
    let locations = body["data"].as_array().unwrap();
    assert_eq!(locations.len(), 1);
    let id = locations[0]["id"].as_i64().unwrap();

    let records = audit_for(&app, "location", id).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["action"], "create");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_interleaved_updates_on_one_asset_chain_correctly() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let category = create_category(&app, "Projectors").await;
    let location = create_location(&app, "AV").await;
    let (_, body) = create_asset(&app, "PRJ-1", category, location).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let mut handles = Vec::new();
    for quantity in 10..20 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let (status, body) = send(
                &app,
                Method::PUT,
                &format!("/api/assets/{id}"),
                Some(json!({ "quantity": quantity })),
                None,
            )
            .await;
            assert_eq!(status, StatusCode::OK, "{body}");
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let updates: Vec<_> = audit_for(&app, "asset", id)
        .await
        .into_iter()
        .filter(|r| r["action"] == "update")
        .collect();
    assert_eq!(updates.len(), 10);

    // Every update saw the value the previous commit left behind
    let steps: std::collections::HashMap<i64, i64> = updates
        .iter()
        .map(|r| {
            let quantity = |side: &str| r["changes"][side]["quantity"].as_i64().unwrap();
            (quantity("before"), quantity("after"))
        })
        .collect();
    assert_eq!(steps.len(), 10, "two updates observed the same prior value");
    let mut current = 1;
    for _ in 0..10 {
        current = steps[&current];
    }
    let (_, body) = send(&app, Method::GET, &format!("/api/assets/{id}"), None, None).await;
    assert_eq!(body["data"]["quantity"], current);
}

#[tokio::test]
async fn test_bulk_create_and_lookup() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let category = create_category(&app, "Laptops").await;
    let location = create_location(&app, "IT").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assets/bulk",
        Some(json!({
            "code": "LT",
            "name": "Laptop",
            "category_id": category,
            "location_id": location,
            "count": 3,
        })),
        Some("frank"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let created = body["data"].as_array().unwrap().clone();
    assert_eq!(created.len(), 3);
    assert_eq!(created[0]["code"], "LT-001");
    assert_eq!(created[0]["is_bulk_parent"], true);
    assert_eq!(created[2]["bulk_sequence"], 3);
    let bulk_id = created[0]["bulk_id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, &format!("/api/assets/bulk/{bulk_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap(), &created);

    for asset in &created {
        let records = audit_for(&app, "asset", asset["id"].as_i64().unwrap()).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["action"], "create");
        assert_eq!(records[0]["actor"], "frank");
    }

    let (status, body) = send(&app, Method::GET, "/api/assets/bulk/nope", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assets/bulk",
        Some(json!({
            "code": "LT",
            "name": "Laptop",
            "category_id": category,
            "location_id": location,
            "count": 1,
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}
