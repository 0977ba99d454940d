//! In-process router tests against the in-memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use equipment_registry_server::{
    api, config::AppConfig, models::CallerClaims, services::Services, AppState,
};

async fn app() -> (Router, AppConfig) {
    let config = AppConfig::default();
    let services = Services::new(&config.storage)
        .await
        .expect("Failed to create services");
    let state = AppState {
        config: Arc::new(config.clone()),
        services: Arc::new(services),
    };
    (api::create_router(state), config)
}

fn token_for(config: &AppConfig, caller: &str) -> String {
    CallerClaims::new(caller, config.auth.jwt_expiration_hours)
        .create_token(&config.auth.jwt_secret)
        .expect("Failed to create token")
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response is not JSON")
    };
    (status, value)
}

fn boiler(model: &str) -> Value {
    json!({
        "equipment_type": "Boiler",
        "model": model,
        "serial_number": "B-2231",
        "installation_date": 1_690_000_000,
        "warranty_expiry": 1_790_000_000
    })
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_equipment_lifecycle() {
    let (app, config) = app().await;
    let alice = token_for(&config, "alice");
    let bob = token_for(&config, "bob");

    // register
    let (status, body) = send(&app, Method::POST, "/api/v1/equipment", Some(&alice), Some(boiler("B1"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["owner"], "alice");
    assert_eq!(body["last_service_date"], 0);

    let (_, body) = send(&app, Method::GET, "/api/v1/owners/alice/equipment-count", None, None).await;
    assert_eq!(body["count"], 1);

    // owner updates
    let (status, body) = send(&app, Method::PUT, "/api/v1/equipment/1", Some(&alice), Some(boiler("X"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "X");

    // non-owner is rejected and nothing changes
    let (status, body) = send(&app, Method::PUT, "/api/v1/equipment/1", Some(&bob), Some(boiler("Y"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "NotAuthorized");
    let (_, body) = send(&app, Method::GET, "/api/v1/equipment/1", None, None).await;
    assert_eq!(body["model"], "X");

    // transfer
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/equipment/1/transfer",
        Some(&alice),
        Some(json!({ "new_owner": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["owner"], "bob");
    let (_, body) = send(&app, Method::GET, "/api/v1/owners/alice/equipment-count", None, None).await;
    assert_eq!(body["count"], 0);
    let (_, body) = send(&app, Method::GET, "/api/v1/owners/bob/equipment-count", None, None).await;
    assert_eq!(body["count"], 1);

    // anyone records a service date, without a token
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/equipment/1/service-date",
        None,
        Some(json!({ "service_date": 1_720_000_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_service_date"], 1_720_000_000);
    assert_eq!(body["owner"], "bob");
}

#[tokio::test]
async fn test_unknown_equipment() {
    let (app, config) = app().await;
    let alice = token_for(&config, "alice");

    let (status, body) = send(&app, Method::GET, "/api/v1/equipment/999", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let (status, body) = send(&app, Method::PUT, "/api/v1/equipment/999", Some(&alice), Some(boiler("X"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchEquipment");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/equipment/999/service-date",
        None,
        Some(json!({ "service_date": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/api/v1/owners/nobody/equipment-count", None, None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_owner_gated_routes_require_token() {
    let (app, config) = app().await;

    let (status, _) = send(&app, Method::POST, "/api/v1/equipment", None, Some(boiler("B1"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/equipment",
        Some("not-a-jwt"),
        Some(boiler("B1")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = CallerClaims::new("alice", config.auth.jwt_expiration_hours)
        .create_token("wrong-secret")
        .unwrap();
    let (status, _) = send(&app, Method::POST, "/api/v1/equipment", Some(&forged), Some(boiler("B1"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
