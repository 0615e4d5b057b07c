//! All three tiers wired together on ephemeral ports.

use axum::{routing::get, Router};
use otel_tiers::{backend_router, database_router, frontend_router, Upstream};
use serde_json::{json, Value};
use std::net::SocketAddr;

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve"); });
    addr
}

#[tokio::test]
async fn database_returns_fake_rows() {
    let db = spawn(database_router()).await;
    let body: Value = reqwest::get(format!("http://{db}/query")).await.unwrap().json().await.unwrap();
    assert_eq!(body, json!({"result": "fake_db_data"}));
}

#[tokio::test]
async fn frontend_nests_backend_and_database_responses() {
    let db = spawn(database_router()).await;
    let backend = spawn(backend_router(Upstream::new(format!("http://{db}")))).await;
    let frontend = spawn(frontend_router(Upstream::new(format!("http://{backend}/")))).await;

    let resp = reqwest::get(format!("http://{frontend}/")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({
        "frontend": "ok",
        "backend_response": {"backend": "ok", "database": {"result": "fake_db_data"}},
    }));
}

#[tokio::test]
async fn backend_reports_bad_gateway_when_database_down() {
    let backend = spawn(backend_router(Upstream::new("http://127.0.0.1:9"))).await;
    let resp = reqwest::get(format!("http://{backend}/data")).await.unwrap();
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("127.0.0.1:9/query"));
}

#[tokio::test]
async fn frontend_reports_bad_gateway_on_non_json_backend() {
    let plain = spawn(Router::new().route("/data", get(|| async { "not json" }))).await;
    let frontend = spawn(frontend_router(Upstream::new(format!("http://{plain}")))).await;
    let resp = reqwest::get(format!("http://{frontend}/")).await.unwrap();
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("non-JSON"));
}
