//! HTTP-level tests for request validation.
//!
//! Every case here must be rejected by the handler before any query is
//! issued, so the suite runs against a lazily created (never connected)
//! pool. Row-level behavior is covered by the client workspace tests
//! against the in-memory store.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, put_json};

// ---------------------------------------------------------------------------
// Assign / unassign
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_assign_with_no_selection_returns_400() {
    let app = common::build_test_app();
    let response = put_json(
        app,
        "/api/v1/entries/assign",
        serde_json::json!({
            "assigned_id": "u-1",
            "assigned_to": "Jane Smith",
            "entry_ids": []
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("No entries selected"));
}

#[tokio::test]
async fn test_assign_with_blank_assignee_returns_400() {
    let app = common::build_test_app();
    let response = put_json(
        app,
        "/api/v1/entries/assign",
        serde_json::json!({
            "assigned_id": "  ",
            "assigned_to": "",
            "entry_ids": [1, 2]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unassign_with_no_selection_returns_400() {
    let app = common::build_test_app();
    let response = put_json(
        app,
        "/api/v1/entries/unassign",
        serde_json::json!({ "entry_ids": [] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("No entries selected"));
}

// ---------------------------------------------------------------------------
// Status change
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_update_status_rejects_unknown_value() {
    let app = common::build_test_app();
    let response = put_json(
        app,
        "/api/v1/entries/1/status",
        serde_json::json!({ "status": "Pending" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Invalid status"));
}

// ---------------------------------------------------------------------------
// Entry creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_entry_requires_names() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/entries",
        serde_json::json!({
            "given_names": "John",
            "family_name": "   "
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("family_name"));
}

#[tokio::test]
async fn test_create_entry_rejects_invalid_status() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/entries",
        serde_json::json!({
            "given_names": "John",
            "family_name": "Doe",
            "status": "Reviewed"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_comment_rejects_empty_body() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/comments",
        serde_json::json!({
            "entry_id": 1,
            "body": "   ",
            "commenter": "Jane Smith",
            "commenter_id": "u-1",
            "posted_at": "2026-03-01 10:00:00"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_create_comment_requires_commenter_identity() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/comments",
        serde_json::json!({
            "entry_id": 1,
            "body": "Check the birth year.",
            "commenter": "",
            "commenter_id": "",
            "posted_at": "2026-03-01 10:00:00"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}
