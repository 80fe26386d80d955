//! Shared harness for HTTP-level integration tests.
//!
//! Builds the full application router (same middleware stack as
//! production) over a `#[sqlx::test]`-provisioned pool, plus request and
//! fixture helpers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use muster_api::auth::jwt::{generate_access_token, JwtConfig};
use muster_api::auth::password::hash_password;
use muster_api::config::ServerConfig;
use muster_api::router::build_app_router;
use muster_api::state::AppState;
use muster_db::models::user::{CreateUser, User};
use muster_db::repositories::{RoleRepo, UnitRepo, UserRepo};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        results_show_respondents: false,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the application router over the given pool with default test
/// configuration.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

/// Build the application router with an explicit configuration (used by
/// tests that flip `results_show_respondents`).
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Plaintext password used by every fixture user.
pub const TEST_PASSWORD: &str = "drill-password-1";

/// Create a user with the given role name directly in the database and
/// return the row plus a valid access token for it.
pub async fn create_user(pool: &PgPool, email: &str, role_name: &str) -> (User, String) {
    let role = RoleRepo::find_by_name(pool, role_name)
        .await
        .expect("role lookup should succeed")
        .unwrap_or_else(|| panic!("seed role '{role_name}' missing"));

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role_id: role.id,
        },
    )
    .await
    .expect("user creation should succeed");

    let token = generate_access_token(user.id, &user.email, &role.name, &test_config().jwt)
        .expect("token generation should succeed");

    (user, token)
}

/// Create a unit directly in the database, returning its id.
pub async fn create_unit(pool: &PgPool, name: &str) -> i64 {
    UnitRepo::create(pool, name, Some("test unit"))
        .await
        .expect("unit creation should succeed")
        .id
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// GET without authentication.
pub async fn get(app: &Router, path: &str) -> Response<Body> {
    send(app, Request::get(path).body(Body::empty()).unwrap()).await
}

/// GET with a Bearer token.
pub async fn get_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::get(path)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// POST a JSON body without authentication.
pub async fn post_json(app: &Router, path: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// POST a JSON body with a Bearer token.
pub async fn post_json_auth(
    app: &Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Request::post(path)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// PUT a JSON body with a Bearer token.
pub async fn put_json_auth(
    app: &Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Request::put(path)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// DELETE with a Bearer token.
pub async fn delete_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::delete(path)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collection should succeed")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("request should complete")
}
