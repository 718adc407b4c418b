mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::catalog;
use roster_sdk::{app_router, MemoryGateway, RosterState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let gw = Arc::new(MemoryGateway::with_courses(catalog()));
    app_router(RosterState::new(gw).shared())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_ready_and_version() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let (status, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "ok");
    let (_, body) = send(&app, "GET", "/version", None).await;
    assert_eq!(body["name"], "roster-sdk");
}

#[tokio::test]
async fn create_then_snapshot_lists_student() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(json!({ "name": "X", "cohort": "AY 2024-25", "status": true, "courseIds": ["c1", "c2"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/api/v1/students", None).await;
    assert_eq!(status, StatusCode::OK);
    let snap = &body["data"];
    assert_eq!(snap["students"][0]["id"], id.as_str());
    assert_eq!(snap["students"][0]["courses"].as_array().unwrap().len(), 2);
    assert_eq!(snap["isLoading"], false);
    assert_eq!(snap["error"], Value::Null);
    assert_eq!(snap["filteredStudents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn patch_with_empty_course_ids_clears_courses() {
    let app = app();
    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(json!({ "name": "X", "cohort": "AY 2024-25", "status": true, "courseIds": ["c1"] })),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/v1/students/{}", id),
        Some(json!({ "status": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["students"][0]["status"], false);
    assert_eq!(body["data"]["students"][0]["courses"].as_array().unwrap().len(), 1);

    let (_, body) = send(
        &app,
        "PATCH",
        &format!("/api/v1/students/{}", id),
        Some(json!({ "courseIds": [] })),
    )
    .await;
    assert!(body["data"]["students"][0]["courses"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn errors_use_envelope_and_land_in_state() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(json!({ "name": "", "cohort": "AY 2024-25", "status": true })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, body) = send(
        &app,
        "DELETE",
        "/api/v1/students/00000000-0000-0000-0000-000000000001",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (_, body) = send(&app, "GET", "/api/v1/students", None).await;
    assert!(body["data"]["error"].as_str().unwrap().starts_with("not found"));

    let (status, _) = send(&app, "DELETE", "/api/v1/students/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_returns_no_content() {
    let app = app();
    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(json!({ "name": "X", "cohort": "AY 2024-25", "status": true })),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let (status, body) = send(&app, "DELETE", &format!("/api/v1/students/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    let (_, body) = send(&app, "GET", "/api/v1/students", None).await;
    assert!(body["data"]["students"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn filters_patch_and_reset() {
    let app = app();
    for name in ["Anna", "Bob"] {
        send(
            &app,
            "POST",
            "/api/v1/students",
            Some(json!({ "name": name, "cohort": "AY 2024-25", "status": true })),
        )
        .await;
    }
    let (status, body) = send(
        &app,
        "PATCH",
        "/api/v1/filters",
        Some(json!({ "class": "", "search": "ann" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "year": "AY 2024-25", "class": "", "search": "ann" }));

    let (_, body) = send(&app, "GET", "/api/v1/students", None).await;
    let filtered = body["data"]["filteredStudents"].as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["name"], "Anna");

    let (_, body) = send(&app, "POST", "/api/v1/filters/reset", None).await;
    assert_eq!(body["data"], json!({ "year": "AY 2024-25", "class": "CBSE 9", "search": "" }));
}

#[tokio::test]
async fn selection_and_courses() {
    let app = app();
    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(json!({ "name": "Anna", "cohort": "AY 2024-25", "status": true })),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "PUT", "/api/v1/selection", Some(json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Anna");

    let (_, body) = send(&app, "PUT", "/api/v1/selection", Some(json!({ "id": null }))).await;
    assert_eq!(body["data"], Value::Null);

    let (status, body) = send(&app, "GET", "/api/v1/courses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 3);
    assert_eq!(body["data"][0]["name"], "CBSE 10 Math");
}

#[tokio::test]
async fn refresh_returns_snapshot() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/v1/students/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isLoading"], false);
    assert!(body["data"]["students"].as_array().unwrap().is_empty());
}
