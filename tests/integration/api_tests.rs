//! Live API tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

use equipment_registry_server::{config::AppConfig, models::CallerClaims};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Token signed the way the server's configuration expects
fn token_for(caller: &str) -> String {
    let auth = AppConfig::load().expect("Failed to load configuration").auth;
    CallerClaims::new(caller, auth.jwt_expiration_hours)
        .create_token(&auth.jwt_secret)
        .expect("Failed to create token")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_and_transfer() {
    let client = Client::new();
    let owner = format!("live-owner-{}", std::process::id());
    let receiver = format!("{}-receiver", owner);

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_for(&owner)))
        .json(&json!({
            "equipment_type": "Generator",
            "model": "G-500",
            "serial_number": "G-0001",
            "installation_date": 1_700_000_000,
            "warranty_expiry": 1_800_000_000
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["id"].as_i64().expect("No id in response");

    let response = client
        .post(format!("{}/equipment/{}/transfer", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token_for(&owner)))
        .json(&json!({ "new_owner": receiver }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = client
        .get(format!("{}/owners/{}/equipment-count", BASE_URL, receiver))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["count"], 1);
}

#[tokio::test]
#[ignore]
async fn test_update_requires_token() {
    let client = Client::new();

    let response = client
        .put(format!("{}/equipment/1", BASE_URL))
        .json(&json!({
            "equipment_type": "Generator",
            "model": "G-500",
            "serial_number": "G-0001",
            "installation_date": 0,
            "warranty_expiry": 0
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
