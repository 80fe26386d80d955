//! Repository for the `survey_responses` table.

use muster_core::answer::AnswerMap;
use muster_core::types::DbId;
use sqlx::PgPool;

use crate::models::survey_response::{ResponseWithRespondent, SurveyResponse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, survey_id, user_id, answers, created_at";

/// Provides append-only operations for responses. No update exists by
/// design: a submitted response is immutable.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Insert a response, returning the created row.
    ///
    /// `uq_survey_responses_survey_user` enforces one response per user per
    /// survey; a concurrent duplicate submission is rejected by the
    /// constraint, not by the caller's pre-check.
    pub async fn create(
        pool: &PgPool,
        survey_id: DbId,
        user_id: DbId,
        answers: &AnswerMap,
    ) -> Result<SurveyResponse, sqlx::Error> {
        let answers =
            serde_json::to_value(answers).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let query = format!(
            "INSERT INTO survey_responses (survey_id, user_id, answers)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SurveyResponse>(&query)
            .bind(survey_id)
            .bind(user_id)
            .bind(answers)
            .fetch_one(pool)
            .await
    }

    /// Find a response by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SurveyResponse>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM survey_responses WHERE id = $1");
        sqlx::query_as::<_, SurveyResponse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Has this user already responded to this survey?
    pub async fn exists(
        pool: &PgPool,
        survey_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM survey_responses WHERE survey_id = $1 AND user_id = $2)",
        )
        .bind(survey_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// List a survey's responses joined with respondent emails, oldest
    /// first (submission order, as aggregation consumes them).
    pub async fn list_by_survey(
        pool: &PgPool,
        survey_id: DbId,
    ) -> Result<Vec<ResponseWithRespondent>, sqlx::Error> {
        sqlx::query_as::<_, ResponseWithRespondent>(
            "SELECT r.id, r.survey_id, r.user_id, u.email, r.answers, r.created_at
             FROM survey_responses r
             JOIN users u ON u.id = r.user_id
             WHERE r.survey_id = $1
             ORDER BY r.created_at ASC, r.id ASC",
        )
        .bind(survey_id)
        .fetch_all(pool)
        .await
    }
}
