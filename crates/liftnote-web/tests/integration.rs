//! End-to-end tests for the HTTP API.
//!
//! These tests spin up the real router on an OS-assigned ephemeral port and
//! make actual HTTP requests via `reqwest`.  The parser behind it talks to a
//! scripted gateway, never the network.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use liftnote_agent::{Gateway, GatewayError};
use liftnote_parser::WorkoutParser;
use liftnote_web::{WebConfig, WebServer};

// ── helpers ──────────────────────────────────────────────────────────────────

/// Maps a handful of inputs to canned model behaviour.
struct Scripted;

#[async_trait]
impl Gateway for Scripted {
    async fn call(&self, _: &str, user_text: &str) -> liftnote_agent::Result<String> {
        match user_text {
            "bench press 135 3x10" => Ok(
                "```json\n[{\"exercise\":\"Barbell Bench Press\",\"weight\":135,\"sets\":3,\"reps\":10,\"duration\":null}]\n```"
                    .into(),
            ),
            "bench heavy" => Ok(r#"[{"exercise":"Bench Press","weight":"heavy"}]"#.into()),
            "offline" => Err(GatewayError::RequestFailed {
                reason: "connection refused".into(),
            }),
            _ => Ok("[]".into()),
        }
    }
}

/// Bind to 127.0.0.1:0, start the server router, return the base URL.
async fn start_test_server() -> String {
    let server = WebServer::new(
        WebConfig::default(),
        WorkoutParser::new(Arc::new(Scripted)),
        "test-model",
    );
    let app = server.router();

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind to port 0");
    let addr: SocketAddr = listener.local_addr().expect("get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://127.0.0.1:{}", addr.port())
}

async fn post_parse(base: &str, input: &str) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/parse"))
        .json(&json!({ "input": input }))
        .send()
        .await
        .expect("request failed");
    let status = resp.status().as_u16();
    let body = resp.json().await.expect("invalid JSON");
    (status, body)
}

// ── GET /api/status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn status_reports_model() {
    let base = start_test_server().await;

    let resp = reqwest::get(format!("{base}/api/status"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);

    let json: Value = resp.json().await.expect("invalid JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model"], "test-model");
    assert!(json["version"].is_string());
}

// ── POST /api/parse ──────────────────────────────────────────────────────────

#[tokio::test]
async fn parse_returns_records() {
    let base = start_test_server().await;
    let (status, body) = post_parse(&base, "bench press 135 3x10").await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!([{
            "exercise": "Barbell Bench Press",
            "weight": 135,
            "sets": 3,
            "reps": 10,
            "duration": null
        }])
    );
}

#[tokio::test]
async fn blank_input_is_empty_list() {
    let base = start_test_server().await;
    let (status, body) = post_parse(&base, "   ").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn validation_failure_is_422() {
    let base = start_test_server().await;
    let (status, body) = post_parse(&base, "bench heavy").await;

    assert_eq!(status, 422);
    assert_eq!(body["error"]["kind"], "validation");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("weight")
    );
}

#[tokio::test]
async fn gateway_failure_is_502() {
    let base = start_test_server().await;
    let (status, body) = post_parse(&base, "offline").await;

    assert_eq!(status, 502);
    assert_eq!(body["error"]["kind"], "gateway");
    assert_eq!(
        body["error"]["message"],
        "llm request failed: connection refused"
    );
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let base = start_test_server().await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/parse"))
        .header("Origin", "http://localhost:5173")
        .json(&json!({ "input": "nothing here" }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
