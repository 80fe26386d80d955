//! HTTP-level integration tests for survey definitions, unit-scoped access,
//! response submission, and cascade deletion.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use muster_db::repositories::{PermissionRepo, ResponseRepo};
use sqlx::PgPool;

fn survey_body(unit_id: i64) -> serde_json::Value {
    serde_json::json!({
        "title": "Evacuation drill recap",
        "description": "Post-drill questionnaire",
        "unit_id": unit_id,
        "questions": [
            {
                "id": "ready",
                "text": "Were you ready when the alarm sounded?",
                "type": "single-choice",
                "options": ["Yes", "No"],
                "required": true
            },
            {
                "id": "gear",
                "text": "Equipment you used",
                "type": "multi-choice",
                "options": ["Radio", "Map", "Torch"],
                "required": false
            },
            {
                "id": "notes",
                "text": "Anything to add?",
                "type": "text",
                "required": false
            }
        ]
    })
}

async fn create_survey(app: &Router, token: &str, unit_id: i64) -> i64 {
    let response = post_json_auth(app, "/api/v1/surveys", token, survey_body(unit_id)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Definition validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn one_option_choice_question_never_reaches_storage(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({
        "title": "Broken",
        "unit_id": unit_id,
        "questions": [
            { "id": "q1", "text": "Pick one", "type": "select", "options": ["Only"], "required": true }
        ]
    });
    let response = post_json_auth(&app, "/api/v1/surveys", &admin_token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM surveys")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "invalid survey must not be stored");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn survey_for_missing_unit_is_not_found(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(&app, "/api/v1/surveys", &admin_token, survey_body(999_999)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_revalidates_questions(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    let app = common::build_test_app(pool);
    let survey_id = create_survey(&app, &admin_token, unit_id).await;

    let broken = serde_json::json!({
        "questions": [
            { "id": "q1", "text": "Pick", "type": "single-choice", "options": ["One"], "required": false }
        ]
    });
    let response = put_json_auth(
        &app,
        &format!("/api/v1/surveys/{survey_id}"),
        &admin_token,
        broken,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let renamed = serde_json::json!({ "title": "Renamed drill recap" });
    let response = put_json_auth(
        &app,
        &format!("/api/v1/surveys/{survey_id}"),
        &admin_token,
        renamed,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Renamed drill recap");
}

// ---------------------------------------------------------------------------
// Unit-scoped access
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unit_surveys_require_grant_for_plain_users(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let (member, member_token) = common::create_user(&pool, "member@test.com", "user").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    let app = common::build_test_app(pool.clone());
    create_survey(&app, &admin_token, unit_id).await;

    // Without a grant: forbidden (not 401 -- identity is fine).
    let denied = get_auth(&app, &format!("/api/v1/units/{unit_id}/surveys"), &member_token).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    PermissionRepo::grant(&pool, member.id, unit_id).await.unwrap();

    let allowed = get_auth(&app, &format!("/api/v1/units/{unit_id}/surveys"), &member_token).await;
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(body_json(allowed).await.as_array().unwrap().len(), 1);

    // Admin sees it without any grant.
    let admin_view = get_auth(&app, &format!("/api/v1/units/{unit_id}/surveys"), &admin_token).await;
    assert_eq!(admin_view.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unit_listing_is_scoped_by_grants(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let (member, member_token) = common::create_user(&pool, "member@test.com", "user").await;
    let alpha = common::create_unit(&pool, "Alpha").await;
    let _bravo = common::create_unit(&pool, "Bravo").await;

    PermissionRepo::grant(&pool, member.id, alpha).await.unwrap();
    let app = common::build_test_app(pool);

    let member_units = body_json(get_auth(&app, "/api/v1/units", &member_token).await).await;
    assert_eq!(member_units.as_array().unwrap().len(), 1);
    assert_eq!(member_units[0]["name"], "Alpha");

    let admin_units = body_json(get_auth(&app, "/api/v1/units", &admin_token).await).await;
    assert_eq!(admin_units.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn survey_read_follows_unit_access(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let (member, member_token) = common::create_user(&pool, "member@test.com", "user").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    let app = common::build_test_app(pool.clone());
    let survey_id = create_survey(&app, &admin_token, unit_id).await;

    let denied = get_auth(&app, &format!("/api/v1/surveys/{survey_id}"), &member_token).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    PermissionRepo::grant(&pool, member.id, unit_id).await.unwrap();

    let allowed = get_auth(&app, &format!("/api/v1/surveys/{survey_id}"), &member_token).await;
    assert_eq!(allowed.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Response submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_required_answer_stores_nothing(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let (member, member_token) = common::create_user(&pool, "member@test.com", "user").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    PermissionRepo::grant(&pool, member.id, unit_id).await.unwrap();
    let app = common::build_test_app(pool.clone());
    let survey_id = create_survey(&app, &admin_token, unit_id).await;

    // "ready" is required and absent.
    let body = serde_json::json!({ "answers": { "notes": "forgot the main question" } });
    let response = post_json_auth(
        &app,
        &format!("/api/v1/surveys/{survey_id}/responses"),
        &member_token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM survey_responses")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "no partial record may be created");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_submission_conflicts_with_one_stored_row(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let (member, member_token) = common::create_user(&pool, "member@test.com", "user").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    PermissionRepo::grant(&pool, member.id, unit_id).await.unwrap();
    let app = common::build_test_app(pool.clone());
    let survey_id = create_survey(&app, &admin_token, unit_id).await;

    let body = serde_json::json!({
        "answers": { "ready": "Yes", "gear": ["Radio"], "notes": "all good" }
    });

    let first = post_json_auth(
        &app,
        &format!("/api/v1/surveys/{survey_id}/responses"),
        &member_token,
        body.clone(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(
        &app,
        &format!("/api/v1/surveys/{survey_id}/responses"),
        &member_token,
        body,
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM survey_responses WHERE survey_id = $1")
            .bind(survey_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn undeclared_option_is_rejected(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let (member, member_token) = common::create_user(&pool, "member@test.com", "user").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    PermissionRepo::grant(&pool, member.id, unit_id).await.unwrap();
    let app = common::build_test_app(pool);
    let survey_id = create_survey(&app, &admin_token, unit_id).await;

    let body = serde_json::json!({ "answers": { "ready": "Maybe" } });
    let response = post_json_auth(
        &app,
        &format!("/api/v1/surveys/{survey_id}/responses"),
        &member_token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submission_without_grant_is_forbidden(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let (_member, member_token) = common::create_user(&pool, "member@test.com", "user").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    let app = common::build_test_app(pool);
    let survey_id = create_survey(&app, &admin_token, unit_id).await;

    let body = serde_json::json!({ "answers": { "ready": "Yes" } });
    let response = post_json_auth(
        &app,
        &format!("/api/v1/surveys/{survey_id}/responses"),
        &member_token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Cascade deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_a_survey_removes_its_responses(pool: PgPool) {
    let (_admin, admin_token) = common::create_user(&pool, "admin@test.com", "admin").await;
    let (member, member_token) = common::create_user(&pool, "member@test.com", "user").await;
    let unit_id = common::create_unit(&pool, "Alpha").await;
    PermissionRepo::grant(&pool, member.id, unit_id).await.unwrap();
    let app = common::build_test_app(pool.clone());
    let survey_id = create_survey(&app, &admin_token, unit_id).await;

    let submitted = post_json_auth(
        &app,
        &format!("/api/v1/surveys/{survey_id}/responses"),
        &member_token,
        serde_json::json!({ "answers": { "ready": "Yes" } }),
    )
    .await;
    assert_eq!(submitted.status(), StatusCode::CREATED);
    let response_id = body_json(submitted).await["id"].as_i64().unwrap();

    let deleted = delete_auth(&app, &format!("/api/v1/surveys/{survey_id}"), &admin_token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    assert!(ResponseRepo::find_by_id(&pool, response_id)
        .await
        .unwrap()
        .is_none());

    let gone = get_auth(&app, &format!("/api/v1/surveys/{survey_id}"), &admin_token).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}
