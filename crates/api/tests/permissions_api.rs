//! HTTP-level integration tests for unit membership grants: duplicate
//! rejection, revocation, filtering, and admin-only gating.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth};
use muster_db::repositories::PermissionRepo;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn grant_twice_yields_one_row_and_conflict(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let (member, _) = common::create_user(&pool, "member@test.com", "user").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({ "user_id": member.id, "unit_id": unit_id });

    let first = post_json_auth(&app, "/api/v1/admin/permissions", &admin_token, body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(&app, "/api/v1/admin/permissions", &admin_token, body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM unit_permissions WHERE user_id = $1")
            .bind(member.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1, "exactly one grant row must exist");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn revoke_removes_grant_and_missing_grant_is_not_found(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let (member, _) = common::create_user(&pool, "member@test.com", "user").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    let app = common::build_test_app(pool.clone());

    let created = post_json_auth(
        &app,
        "/api/v1/admin/permissions",
        &admin_token,
        serde_json::json!({ "user_id": member.id, "unit_id": unit_id }),
    )
    .await;
    let grant_id = body_json(created).await["id"].as_i64().unwrap();

    let revoked = delete_auth(
        &app,
        &format!("/api/v1/admin/permissions/{grant_id}"),
        &admin_token,
    )
    .await;
    assert_eq!(revoked.status(), StatusCode::NO_CONTENT);

    assert!(!PermissionRepo::has_grant(&pool, member.id, unit_id)
        .await
        .unwrap());

    let again = delete_auth(
        &app,
        &format!("/api/v1/admin/permissions/{grant_id}"),
        &admin_token,
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn grant_for_unknown_user_or_unit_is_not_found(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let (member, _) = common::create_user(&pool, "member@test.com", "user").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    let app = common::build_test_app(pool);

    let ghost_user = post_json_auth(
        &app,
        "/api/v1/admin/permissions",
        &admin_token,
        serde_json::json!({ "user_id": 999_999, "unit_id": unit_id }),
    )
    .await;
    assert_eq!(ghost_user.status(), StatusCode::NOT_FOUND);

    let ghost_unit = post_json_auth(
        &app,
        "/api/v1/admin/permissions",
        &admin_token,
        serde_json::json!({ "user_id": member.id, "unit_id": 999_999 }),
    )
    .await;
    assert_eq!(ghost_unit.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admin_cannot_touch_permissions(pool: PgPool) {
    let (member, member_token) = common::create_user(&pool, "member@test.com", "user").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    let app = common::build_test_app(pool);

    let grant = post_json_auth(
        &app,
        "/api/v1/admin/permissions",
        &member_token,
        serde_json::json!({ "user_id": member.id, "unit_id": unit_id }),
    )
    .await;
    assert_eq!(grant.status(), StatusCode::FORBIDDEN);

    let list = get_auth(&app, "/api/v1/admin/permissions", &member_token).await;
    assert_eq!(list.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn listing_filters_by_user_and_unit(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let (a, _) = common::create_user(&pool, "a@test.com", "user").await;
    let (b, _) = common::create_user(&pool, "b@test.com", "user").await;
    let alpha = common::create_unit(&pool, "Alpha").await;
    let bravo = common::create_unit(&pool, "Bravo").await;

    PermissionRepo::grant(&pool, a.id, alpha).await.unwrap();
    PermissionRepo::grant(&pool, a.id, bravo).await.unwrap();
    PermissionRepo::grant(&pool, b.id, alpha).await.unwrap();

    let app = common::build_test_app(pool);

    let by_user = body_json(
        get_auth(
            &app,
            &format!("/api/v1/admin/permissions?user_id={}", a.id),
            &admin_token,
        )
        .await,
    )
    .await;
    assert_eq!(by_user.as_array().unwrap().len(), 2);

    let by_unit = body_json(
        get_auth(
            &app,
            &format!("/api/v1/admin/permissions?unit_id={alpha}"),
            &admin_token,
        )
        .await,
    )
    .await;
    assert_eq!(by_unit.as_array().unwrap().len(), 2);

    let by_both = body_json(
        get_auth(
            &app,
            &format!("/api/v1/admin/permissions?user_id={}&unit_id={bravo}", a.id),
            &admin_token,
        )
        .await,
    )
    .await;
    assert_eq!(by_both.as_array().unwrap().len(), 1);
}
