//! API surface tests: subscriber lifecycle, job queries, status.

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn subscriber_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    common::spawn_app(common::test_config(28611, &dir)).await;

    let client = reqwest::Client::new();
    let base = "http://127.0.0.1:28611";
    common::wait_for_db(&client, base).await;

    // Create
    let res = client
        .post(format!("{base}/api/subscribers"))
        .json(&json!({"email": "dev@example.test", "keywords": ["rust", "backend"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["email"], "dev@example.test");

    // Duplicate
    let res = client
        .post(format!("{base}/api/subscribers"))
        .json(&json!({"email": "dev@example.test"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Deactivate
    let res = client
        .delete(format!("{base}/api/subscribers/dev@example.test"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Already gone
    let res = client
        .delete(format!("{base}/api/subscribers/dev@example.test"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    common::spawn_app(common::test_config(28612, &dir)).await;

    let client = reqwest::Client::new();
    let base = "http://127.0.0.1:28612";
    common::wait_for_db(&client, base).await;

    let res = client
        .post(format!("{base}/api/subscribers"))
        .json(&json!({"email": "not-an-email"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn job_queries_on_empty_database() {
    let dir = tempfile::tempdir().unwrap();
    common::spawn_app(common::test_config(28613, &dir)).await;

    let client = reqwest::Client::new();
    let base = "http://127.0.0.1:28613";
    common::wait_for_db(&client, base).await;

    let res = client.get(format!("{base}/api/jobs")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let jobs: serde_json::Value = res.json().await.unwrap();
    assert_eq!(jobs.as_array().unwrap().len(), 0);

    let res = client
        .get(format!("{base}/api/jobs/12345"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_reports_database_and_version() {
    let dir = tempfile::tempdir().unwrap();
    common::spawn_app(common::test_config(28614, &dir)).await;

    let client = reqwest::Client::new();
    let base = "http://127.0.0.1:28614";
    common::wait_for_db(&client, base).await;

    let status: serde_json::Value = client
        .get(format!("{base}/api/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["status"], "operational");
    assert_eq!(status["database_connected"], true);
    assert_eq!(status["version"], env!("CARGO_PKG_VERSION"));
}
