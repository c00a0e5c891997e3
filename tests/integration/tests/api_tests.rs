//! REST API integration tests

use integration_tests::TestServer;
use reqwest::StatusCode;

#[tokio::test]
async fn health_check_works() {
    let server = TestServer::start().await.unwrap();

    let response = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn submit_returns_receipt() {
    let server = TestServer::start().await.unwrap();

    let response = server.submit("r1", Some("Alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["event_id"].is_string());
    assert_eq!(body["seq"], 1);
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn unaddressed_reactions_count_total_only() {
    let server = TestServer::start().await.unwrap();

    for _ in 0..3 {
        let response = server.submit("r1", None).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    let snapshot = server.snapshot("r1").await.unwrap();
    assert_eq!(snapshot["total"], 3);
    assert_eq!(snapshot["ranking"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn ranking_orders_recipients_by_count() {
    let server = TestServer::start().await.unwrap();

    for name in ["Alice", "Bob", "Alice"] {
        server.submit("r2", Some(name)).await.unwrap();
    }

    let snapshot = server.snapshot("r2").await.unwrap();
    assert_eq!(snapshot["total"], 3);

    let ranking = snapshot["ranking"].as_array().unwrap();
    assert_eq!(ranking[0]["name"], "Alice");
    assert_eq!(ranking[0]["count"], 2);
    assert_eq!(ranking[1]["name"], "Bob");
    assert_eq!(ranking[1]["count"], 1);
}

#[tokio::test]
async fn whitespace_recipient_is_treated_as_absent() {
    let server = TestServer::start().await.unwrap();

    server.submit("r3", Some("   ")).await.unwrap();

    let snapshot = server.snapshot("r3").await.unwrap();
    assert_eq!(snapshot["total"], 1);
    assert!(snapshot["ranking"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn oversized_recipient_is_rejected() {
    let server = TestServer::start().await.unwrap();

    let long_name = "x".repeat(65);
    let response = server.submit("r4", Some(&long_name)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Nothing was counted
    let snapshot = server.snapshot("r4").await.unwrap();
    assert_eq!(snapshot["total"], 0);
}

#[tokio::test]
async fn rooms_are_isolated_over_http() {
    let server = TestServer::start().await.unwrap();

    server.submit("a", Some("Alice")).await.unwrap();
    server.submit("a", None).await.unwrap();

    let other = server.snapshot("b").await.unwrap();
    assert_eq!(other["total"], 0);

    let original = server.snapshot("a").await.unwrap();
    assert_eq!(original["total"], 2);
}

#[tokio::test]
async fn unknown_room_snapshot_is_empty_not_error() {
    let server = TestServer::start().await.unwrap();

    let snapshot = server.snapshot("never-seen").await.unwrap();
    assert_eq!(snapshot["room_id"], "never-seen");
    assert_eq!(snapshot["total"], 0);
}
