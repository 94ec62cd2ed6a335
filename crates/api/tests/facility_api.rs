//! Integration tests for the `/facilities` endpoints.
//!
//! Covers authorization (admin-only mutations, identity required), the
//! `{ "data": ... }` envelope, and the error body shape
//! (`{ "error", "code" }`).

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json, seed_admin, seed_attendant};
use serde_json::json;
use sqlx::PgPool;

fn facility_body(code: &str) -> serde_json::Value {
    json!({
        "code": code,
        "name": format!("Facility {code}"),
        "total_spaces": 10,
        "hourly_rate": "10.00",
        "location": "North side"
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_creates_and_reads_facility(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/facilities",
        Some(admin),
        facility_body("lot-a"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["code"], "LOT-A");
    assert_eq!(json["data"]["occupied_spaces"], 0);
    let id = json["data"]["id"].as_i64().unwrap();

    let response = get(app, &format!("/api/v1/facilities/{id}"), Some(admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Facility lot-a");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_requires_admin_role(pool: PgPool) {
    let attendant = seed_attendant(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/facilities",
        Some(attendant),
        facility_body("LOT-A"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn requests_without_identity_are_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/facilities", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_code_is_conflict(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/facilities",
        Some(admin),
        facility_body("LOT-A"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        app,
        "/api/v1/facilities",
        Some(admin),
        facility_body("lot-a"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_code_is_validation_error(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/facilities",
        Some(admin),
        facility_body("not a valid code!"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_facility_is_not_found(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/facilities/424242", Some(admin)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_and_delete_roundtrip(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/facilities",
        Some(admin),
        facility_body("LOT-A"),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json(
        app.clone(),
        &format!("/api/v1/facilities/{id}"),
        Some(admin),
        json!({ "name": "Renamed", "total_spaces": 25 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Renamed");
    assert_eq!(json["data"]["total_spaces"], 25);

    let response = delete(app.clone(), &format!("/api/v1/facilities/{id}"), Some(admin)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/facilities/{id}"), Some(admin)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
