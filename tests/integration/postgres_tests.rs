//! Postgres store tests against a live database

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;

use equipment_registry_server::{
    models::{EquipmentDetails, OwnerId},
    registry::EquipmentRegistry,
    repository::{EquipmentRepository, LedgerStore},
};

/// Store on the database named by DATABASE_URL, migrated to the current schema
async fn connect() -> EquipmentRepository {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    EquipmentRepository::new(pool)
}

fn details(model: &str) -> EquipmentDetails {
    EquipmentDetails {
        equipment_type: "Transformer".to_string(),
        model: model.to_string(),
        serial_number: "T-77".to_string(),
        installation_date: 1_650_000_000,
        warranty_expiry: 1_750_000_000,
    }
}

/// Owner names no earlier run has used
fn fresh_owner(role: &str) -> OwnerId {
    OwnerId::new(format!("pg-{}-{}", role, Utc::now().timestamp_micros()))
}

#[tokio::test]
#[ignore] // Run with: DATABASE_URL=... cargo test -- --ignored
async fn test_commits_survive_reload() {
    let store = connect().await;
    let (mut registry, _) = EquipmentRegistry::restore(store.load().await.unwrap());
    let seller = fresh_owner("seller");
    let buyer = fresh_owner("buyer");

    let commit = registry.plan_register(&seller, details("T-1"));
    store.commit(&commit).await.unwrap();
    let id = registry.apply(commit).id;

    let commit = registry.plan_transfer(&seller, id, buyer.clone()).unwrap();
    store.commit(&commit).await.unwrap();
    registry.apply(commit);

    let commit = registry.plan_service_date(id, 1_700_000_123).unwrap();
    store.commit(&commit).await.unwrap();
    registry.apply(commit);

    let (reloaded, _) = EquipmentRegistry::restore(store.load().await.unwrap());
    assert_eq!(reloaded.snapshot(), registry.snapshot());
    assert_eq!(reloaded.owner_equipment_count(&seller), 0);
    assert_eq!(reloaded.owner_equipment_count(&buyer), 1);
    assert_eq!(reloaded.get_details(id).unwrap().last_service_date, 1_700_000_123);
    assert_eq!(reloaded.next_id(), id + 1);
}

#[tokio::test]
#[ignore]
async fn test_taken_id_is_not_overwritten() {
    let store = connect().await;
    let (registry, _) = EquipmentRegistry::restore(store.load().await.unwrap());
    let first_owner = fresh_owner("first");
    let second_owner = fresh_owner("second");

    let first = registry.plan_register(&first_owner, details("first"));
    store.commit(&first).await.unwrap();

    // planned against the same stale state, so it reuses the id
    let second = registry.plan_register(&second_owner, details("second"));
    assert_eq!(second.record.id, first.record.id);
    assert!(store.commit(&second).await.is_err());

    let snapshot = store.load().await.unwrap();
    let stored = snapshot
        .records
        .iter()
        .find(|r| r.id == first.record.id)
        .expect("first record missing");
    assert_eq!(stored.owner, first_owner);
    assert!(!snapshot.owner_counts.iter().any(|(owner, _)| owner == &second_owner));
}

#[tokio::test]
#[ignore]
async fn test_negative_count_is_rejected() {
    let store = connect().await;
    let owner = fresh_owner("negative");

    assert!(store.repair_counts(&[(owner, -1)]).await.is_err());
}
