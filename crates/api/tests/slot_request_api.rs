//! Integration tests for the `/slot-requests` endpoints.
//!
//! Covers creation guards surfacing as HTTP statuses, list scoping for
//! non-admin callers, and the resolve endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, seed_admin, seed_customer, Identity};
use parkfleet_core::types::DbId;
use parkfleet_db::models::slot::CreateSlot;
use parkfleet_db::models::vehicle::CreateVehicle;
use parkfleet_db::repositories::{SlotRepo, VehicleRepo};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

async fn seed_vehicle(pool: &PgPool, owner: Identity, plate: &str) -> DbId {
    VehicleRepo::create(
        pool,
        &CreateVehicle {
            user_id: owner.user_id,
            plate_number: plate.to_string(),
            size: "medium".to_string(),
            vehicle_type: "car".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_slot(pool: &PgPool, number: &str) -> DbId {
    SlotRepo::create(
        pool,
        &CreateSlot {
            slot_number: number.to_string(),
            size: "medium".to_string(),
            vehicle_type: "car".to_string(),
            location: None,
            hourly_rate: Some(Decimal::new(1000, 2)), // 10.00
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../db/migrations")]
async fn customer_creates_pending_request(pool: PgPool) {
    let customer = seed_customer(&pool, "alice@example.com", Decimal::new(10000, 2)).await;
    let vehicle = seed_vehicle(&pool, customer, "ABC-123").await;
    let slot = seed_slot(&pool, "S-01").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/slot-requests",
        Some(customer),
        json!({ "vehicle_id": vehicle, "slot_id": slot, "expected_duration_hours": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "PENDING");
    assert_eq!(json["data"]["calculated_cost"], "30.00");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn insufficient_balance_is_unprocessable(pool: PgPool) {
    let customer = seed_customer(&pool, "alice@example.com", Decimal::new(1000, 2)).await; // 10.00
    let vehicle = seed_vehicle(&pool, customer, "ABC-123").await;
    let slot = seed_slot(&pool, "S-01").await;
    let app = common::build_test_app(pool);

    // 3h * 10.00 = 30.00 > 10.00 balance.
    let response = post_json(
        app,
        "/api/v1/slot-requests",
        Some(customer),
        json!({ "vehicle_id": vehicle, "slot_id": slot, "expected_duration_hours": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_BALANCE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn second_active_request_is_conflict(pool: PgPool) {
    let customer = seed_customer(&pool, "alice@example.com", Decimal::new(10000, 2)).await;
    let vehicle = seed_vehicle(&pool, customer, "ABC-123").await;
    let slot_a = seed_slot(&pool, "S-01").await;
    let slot_b = seed_slot(&pool, "S-02").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/slot-requests",
        Some(customer),
        json!({ "vehicle_id": vehicle, "slot_id": slot_a, "expected_duration_hours": 2 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        app,
        "/api/v1/slot-requests",
        Some(customer),
        json!({ "vehicle_id": vehicle, "slot_id": slot_b, "expected_duration_hours": 2 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_scoped_to_the_caller(pool: PgPool) {
    let alice = seed_customer(&pool, "alice@example.com", Decimal::new(10000, 2)).await;
    let bob = seed_customer(&pool, "bob@example.com", Decimal::new(10000, 2)).await;
    let admin = seed_admin(&pool).await;
    let alices_car = seed_vehicle(&pool, alice, "ABC-123").await;
    let bobs_car = seed_vehicle(&pool, bob, "BOB-456").await;
    let slot_a = seed_slot(&pool, "S-01").await;
    let slot_b = seed_slot(&pool, "S-02").await;
    let app = common::build_test_app(pool);

    post_json(
        app.clone(),
        "/api/v1/slot-requests",
        Some(alice),
        json!({ "vehicle_id": alices_car, "slot_id": slot_a, "expected_duration_hours": 2 }),
    )
    .await;
    post_json(
        app.clone(),
        "/api/v1/slot-requests",
        Some(bob),
        json!({ "vehicle_id": bobs_car, "slot_id": slot_b, "expected_duration_hours": 2 }),
    )
    .await;

    // Alice only sees her own, even when she asks for Bob's.
    let response = get(
        app.clone(),
        &format!("/api/v1/slot-requests?user_id={}", bob.user_id),
        Some(alice),
    )
    .await;
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["user_id"].as_i64().unwrap(), alice.user_id);

    // The admin sees everything.
    let response = get(app, "/api/v1/slot-requests", Some(admin)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn approve_is_admin_only_and_reserves_slot(pool: PgPool) {
    let customer = seed_customer(&pool, "alice@example.com", Decimal::new(10000, 2)).await;
    let admin = seed_admin(&pool).await;
    let vehicle = seed_vehicle(&pool, customer, "ABC-123").await;
    let slot = seed_slot(&pool, "S-01").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/slot-requests",
        Some(customer),
        json!({ "vehicle_id": vehicle, "slot_id": slot, "expected_duration_hours": 2 }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // A customer may not resolve requests.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/slot-requests/{id}/approve"),
        Some(customer),
        json!({ "slot_id": slot }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/slot-requests/{id}/approve"),
        Some(admin),
        json!({ "slot_id": slot, "admin_notes": "ok" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "APPROVED");

    let response = get(app, &format!("/api/v1/slots/{slot}"), Some(admin)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "UNAVAILABLE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancel_by_another_user_is_forbidden(pool: PgPool) {
    let alice = seed_customer(&pool, "alice@example.com", Decimal::new(10000, 2)).await;
    let bob = seed_customer(&pool, "bob@example.com", Decimal::new(10000, 2)).await;
    let vehicle = seed_vehicle(&pool, alice, "ABC-123").await;
    let slot = seed_slot(&pool, "S-01").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/slot-requests",
        Some(alice),
        json!({ "vehicle_id": vehicle, "slot_id": slot, "expected_duration_hours": 2 }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/slot-requests/{id}/cancel"),
        Some(bob),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(
        app,
        &format!("/api/v1/slot-requests/{id}/cancel"),
        Some(alice),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "CANCELLED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reject_resolved_request_is_state_conflict(pool: PgPool) {
    let customer = seed_customer(&pool, "alice@example.com", Decimal::new(10000, 2)).await;
    let admin = seed_admin(&pool).await;
    let vehicle = seed_vehicle(&pool, customer, "ABC-123").await;
    let slot = seed_slot(&pool, "S-01").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/slot-requests",
        Some(customer),
        json!({ "vehicle_id": vehicle, "slot_id": slot, "expected_duration_hours": 2 }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/slot-requests/{id}/reject"),
        Some(admin),
        json!({ "admin_notes": "no" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app,
        &format!("/api/v1/slot-requests/{id}/reject"),
        Some(admin),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "STATE_CONFLICT");
}
