//! End-to-end API tests against a daemon on an ephemeral port

use serde_json::{json, Value};
use std::sync::Arc;
use vslm_control::ControlPlane;
use vslm_daemon::{create_router, AppState};
use vslm_registry::{InMemoryAuditLog, InMemoryServerStore, ServerDirectory};
use vslm_types::ServerStatus;

async fn spawn_daemon(initial_status: ServerStatus) -> String {
    let store = Arc::new(InMemoryServerStore::new());
    let audit = Arc::new(InMemoryAuditLog::new());
    let directory = ServerDirectory::new(store, initial_status);
    let control = Arc::new(ControlPlane::new(directory, audit));
    let app = create_router(AppState::new(control));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_server_lifecycle_over_http() {
    let base = spawn_daemon(ServerStatus::Running).await;
    let client = reqwest::Client::new();

    // Create a prime server
    let resp = client
        .post(format!("{base}/api/server"))
        .json(&json!({"region": "us-east-1", "type": "prime"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "success");
    assert_eq!(body["status"], "running");
    let id = body["id"].as_str().unwrap().to_string();

    // Inspect it
    let resp = client
        .get(format!("{base}/api/server/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["server"]["status"], "running");
    assert_eq!(body["server"]["type"], "prime");
    assert_eq!(body["server"]["billing_rate"], 12.0);

    // Stop it
    let resp = client
        .post(format!("{base}/api/servers/{id}/action"))
        .json(&json!({"action": "stop"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Server action completed successfully");
    assert_eq!(body["server"]["status"], "stopped");

    // Stopping again conflicts
    let resp = client
        .post(format!("{base}/api/servers/{id}/action"))
        .json(&json!({"action": "stop"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Server is already stopped.");
    assert_eq!(body["code"], "CONFLICT");

    // Start it back up, then reboot (a no-op)
    let resp = client
        .post(format!("{base}/api/servers/{id}/action"))
        .json(&json!({"action": "start"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .post(format!("{base}/api/servers/{id}/action"))
        .json(&json!({"action": "reboot"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Action 'reboot' processed for server. Status remains 'running'."
    );
    assert_eq!(body["server"]["status"], "running");

    // List shows the one server
    let resp = client
        .get(format!("{base}/api/servers"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["server"].as_array().unwrap().len(), 1);

    // The audit trail recorded every step: created, stop, denied stop,
    // start, reboot no-op
    let resp = client
        .get(format!("{base}/api/servers/{id}/logs"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 5);
    assert_eq!(events[0]["event_type"], "SERVER_CREATED");
    assert_eq!(events[1]["event_type"], "STATUS_CHANGE");
    assert_eq!(events[2]["event_type"], "ACTION_DENIED");
    assert_eq!(events[3]["event_type"], "STATUS_CHANGE");
    assert_eq!(events[4]["event_type"], "ACTION_NO_CHANGE");
}

#[tokio::test]
async fn test_unknown_server_is_404() {
    let base = spawn_daemon(ServerStatus::Running).await;
    let client = reqwest::Client::new();

    let missing = uuid::Uuid::new_v4();
    let resp = client
        .get(format!("{base}/api/server/{missing}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .post(format!("{base}/api/servers/{missing}/action"))
        .json(&json!({"action": "start"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_unsupported_action_is_400() {
    let base = spawn_daemon(ServerStatus::Running).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/server"))
        .json(&json!({"region": "eu-west-1", "type": "basic"}))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let id = body["id"].as_str().unwrap().to_string();

    let resp = client
        .post(format!("{base}/api/servers/{id}/action"))
        .json(&json!({"action": "explode"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Action 'explode' is not supported."));
}

#[tokio::test]
async fn test_pending_initial_status_blocks_start() {
    let base = spawn_daemon(ServerStatus::Pending).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/server"))
        .json(&json!({"region": "ap-south-1", "type": "plus"}))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "pending");
    let id = body["id"].as_str().unwrap().to_string();

    let resp = client
        .post(format!("{base}/api/servers/{id}/action"))
        .json(&json!({"action": "start"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    // Terminate works from pending; a second terminate is denied
    let resp = client
        .post(format!("{base}/api/servers/{id}/action"))
        .json(&json!({"action": "terminate"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["server"]["status"], "terminated");

    let resp = client
        .post(format!("{base}/api/servers/{id}/action"))
        .json(&json!({"action": "terminate"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Server is already terminated.");
}

#[tokio::test]
async fn test_health_and_status() {
    let base = spawn_daemon(ServerStatus::Running).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let resp = client.get(format!("{base}/status")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["version"].as_str().is_some());
}
