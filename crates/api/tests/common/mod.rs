#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use parkfleet_core::types::DbId;
use parkfleet_db::models::user::CreateUser;
use parkfleet_db::repositories::UserRepo;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use parkfleet_api::config::ServerConfig;
use parkfleet_api::notifications::LogNotifier;
use parkfleet_api::router::build_app_router;
use parkfleet_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Delegates to the same [`build_app_router`] that `main.rs` uses, so
/// integration tests exercise the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifier: Arc::new(LogNotifier),
    };
    build_app_router(state, &config)
}

/// An identity forwarded in the gateway trust headers.
#[derive(Clone, Copy)]
pub struct Identity {
    pub user_id: DbId,
    pub role: &'static str,
}

/// Send a request through the router, optionally with an identity and a
/// JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    identity: Option<Identity>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = identity {
        builder = builder
            .header("x-user-id", id.user_id.to_string())
            .header("x-user-role", id.role);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, identity: Option<Identity>) -> Response<Body> {
    send(app, Method::GET, uri, identity, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    identity: Option<Identity>,
    body: Value,
) -> Response<Body> {
    send(app, Method::POST, uri, identity, Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    identity: Option<Identity>,
    body: Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, identity, Some(body)).await
}

pub async fn delete(app: Router, uri: &str, identity: Option<Identity>) -> Response<Body> {
    send(app, Method::DELETE, uri, identity, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Seed a user row and return an identity carrying its id and role.
pub async fn seed_identity(
    pool: &PgPool,
    email: &str,
    role: &'static str,
    balance: Decimal,
) -> Identity {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            full_name: format!("Test {role}"),
            email: email.to_string(),
            role: role.to_string(),
            balance: Some(balance),
        },
    )
    .await
    .unwrap();
    Identity {
        user_id: user.id,
        role,
    }
}

pub async fn seed_admin(pool: &PgPool) -> Identity {
    seed_identity(pool, "admin@example.com", "admin", Decimal::ZERO).await
}

pub async fn seed_attendant(pool: &PgPool) -> Identity {
    seed_identity(pool, "attendant@example.com", "attendant", Decimal::ZERO).await
}

pub async fn seed_customer(pool: &PgPool, email: &str, balance: Decimal) -> Identity {
    seed_identity(pool, email, "customer", balance).await
}
