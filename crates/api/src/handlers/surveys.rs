//! Handlers for the `/surveys` resource: definitions, responses, results.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use muster_core::access::Operation;
use muster_core::aggregation::{aggregate, IdentityPolicy, ResponseInput, SurveyReport};
use muster_core::answer::{validate_answers, AnswerMap};
use muster_core::error::CoreError;
use muster_core::question::validate_questions;
use muster_core::types::DbId;
use muster_db::models::survey::{CreateSurvey, Survey, UpdateSurvey};
use muster_db::models::survey_response::{ResponseWithRespondent, SurveyResponse};
use muster_db::repositories::{ResponseRepo, SurveyRepo, UnitRepo};
use serde::Deserialize;

use crate::access::AccessControl;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Survey definitions
// ---------------------------------------------------------------------------

/// GET /api/v1/surveys
///
/// Admin-only listing of every survey, most recently created first.
pub async fn list_surveys(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
) -> AppResult<Json<Vec<Survey>>> {
    let surveys = SurveyRepo::list(&state.pool).await?;
    Ok(Json(surveys))
}

/// POST /api/v1/surveys
///
/// Create a survey in a unit. Questions are validated in full before
/// anything reaches storage; an invalid definition is never stored.
pub async fn create_survey(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Json(input): Json<CreateSurvey>,
) -> AppResult<(StatusCode, Json<Survey>)> {
    AccessControl::authorize(&state.pool, &user, Operation::ManageUnit, input.unit_id).await?;

    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Survey title must not be empty".into(),
        )));
    }
    validate_questions(&input.questions).map_err(AppError::Core)?;

    // The FK would also reject a missing unit, but as an opaque 500.
    UnitRepo::find_by_id(&state.pool, input.unit_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "unit",
            id: input.unit_id,
        }))?;

    let survey = SurveyRepo::create(&state.pool, &input, user.user_id).await?;
    tracing::info!(survey_id = survey.id, unit_id = survey.unit_id, "created survey");

    Ok((StatusCode::CREATED, Json(survey)))
}

/// GET /api/v1/surveys/{id}
///
/// Read a survey definition in order to answer it.
pub async fn get_survey(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Survey>> {
    let survey = find_survey(&state, id).await?;
    AccessControl::authorize(&state.pool, &user, Operation::ViewSurvey, survey.unit_id).await?;
    Ok(Json(survey))
}

/// PUT /api/v1/surveys/{id}
///
/// Update a survey definition. A changed question list is re-validated in
/// full under the same rules as creation.
pub async fn update_survey(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSurvey>,
) -> AppResult<Json<Survey>> {
    let survey = find_survey(&state, id).await?;
    AccessControl::authorize(&state.pool, &user, Operation::ManageUnit, survey.unit_id).await?;

    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Survey title must not be empty".into(),
            )));
        }
    }
    if let Some(questions) = &input.questions {
        validate_questions(questions).map_err(AppError::Core)?;
    }

    let updated = SurveyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "survey", id }))?;

    Ok(Json(updated))
}

/// DELETE /api/v1/surveys/{id}
///
/// Delete a survey; its responses cascade away with it at the storage
/// level, so no orphaned response can survive.
pub async fn delete_survey(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let survey = find_survey(&state, id).await?;
    AccessControl::authorize(&state.pool, &user, Operation::ManageUnit, survey.unit_id).await?;

    SurveyRepo::delete(&state.pool, id).await?;
    tracing::info!(survey_id = id, "deleted survey and its responses");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Request body for `POST /surveys/{id}/responses`.
#[derive(Debug, Deserialize)]
pub struct SubmitResponseRequest {
    pub answers: AnswerMap,
}

/// POST /api/v1/surveys/{id}/responses
///
/// Submit a response. Validation rejects the submission whole on any rule
/// violation; nothing partial is stored. One response per user per survey:
/// the pre-check gives a friendly 409 and the unique constraint settles
/// concurrent duplicates.
pub async fn submit_response(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitResponseRequest>,
) -> AppResult<(StatusCode, Json<SurveyResponse>)> {
    let survey = find_survey(&state, id).await?;
    AccessControl::authorize(&state.pool, &user, Operation::SubmitResponse, survey.unit_id)
        .await?;

    let questions = survey
        .questions()
        .map_err(|e| AppError::InternalError(format!("Stored questions are corrupt: {e}")))?;
    validate_answers(&questions, &input.answers).map_err(AppError::Core)?;

    if ResponseRepo::exists(&state.pool, survey.id, user.user_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "You have already responded to this survey".into(),
        )));
    }

    let response = ResponseRepo::create(&state.pool, survey.id, user.user_id, &input.answers)
        .await?;
    tracing::info!(survey_id = survey.id, response_id = response.id, "stored response");

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/surveys/{id}/responses
///
/// Admin-only raw listing of a survey's responses with respondent emails,
/// oldest first.
pub async fn list_responses(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<ResponseWithRespondent>>> {
    let survey = find_survey(&state, id).await?;
    AccessControl::authorize(&state.pool, &user, Operation::ViewResults, survey.unit_id).await?;

    let responses = ResponseRepo::list_by_survey(&state.pool, survey.id).await?;
    Ok(Json(responses))
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// GET /api/v1/surveys/{id}/results
///
/// Admin-only aggregated report. Responses whose stored answers no longer
/// decode or no longer match the question set are tolerated per the
/// engine's schema-drift rules; the report is produced regardless.
pub async fn survey_results(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<SurveyReport>> {
    let survey = find_survey(&state, id).await?;
    AccessControl::authorize(&state.pool, &user, Operation::ViewResults, survey.unit_id).await?;

    let questions = survey
        .questions()
        .map_err(|e| AppError::InternalError(format!("Stored questions are corrupt: {e}")))?;

    let rows = ResponseRepo::list_by_survey(&state.pool, survey.id).await?;
    let inputs: Vec<ResponseInput> = rows
        .iter()
        .filter_map(|row| match row.answers() {
            Ok(answers) => Some(ResponseInput {
                respondent: row.email.clone(),
                created_at: row.created_at,
                answers,
            }),
            Err(e) => {
                // Undecodable historical rows are dropped, not fatal.
                tracing::warn!(response_id = row.id, error = %e, "skipping corrupt response");
                None
            }
        })
        .collect();

    let identity = if state.config.results_show_respondents {
        IdentityPolicy::Named
    } else {
        IdentityPolicy::Anonymous
    };

    Ok(Json(aggregate(&questions, &inputs, identity)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_survey(state: &AppState, id: DbId) -> Result<Survey, AppError> {
    SurveyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "survey", id }))
}
