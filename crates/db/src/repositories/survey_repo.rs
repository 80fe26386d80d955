//! Repository for the `surveys` table.

use muster_core::question::Question;
use muster_core::types::DbId;
use sqlx::PgPool;

use crate::models::survey::{CreateSurvey, Survey, UpdateSurvey};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, unit_id, questions, start_time, \
                       duration_minutes, created_by, created_at, updated_at";

/// Provides CRUD operations for surveys. Callers validate questions with
/// `muster_core::question::validate_questions` before create/update.
pub struct SurveyRepo;

impl SurveyRepo {
    /// Insert a new survey owned by `created_by`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSurvey,
        created_by: DbId,
    ) -> Result<Survey, sqlx::Error> {
        let questions = questions_json(&input.questions)?;
        let query = format!(
            "INSERT INTO surveys (title, description, unit_id, questions, start_time, \
                                  duration_minutes, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Survey>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.unit_id)
            .bind(questions)
            .bind(input.start_time)
            .bind(input.duration_minutes)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a survey by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Survey>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM surveys WHERE id = $1");
        sqlx::query_as::<_, Survey>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all surveys, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Survey>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM surveys ORDER BY created_at DESC");
        sqlx::query_as::<_, Survey>(&query).fetch_all(pool).await
    }

    /// List the surveys belonging to a unit, most recently created first.
    pub async fn list_by_unit(pool: &PgPool, unit_id: DbId) -> Result<Vec<Survey>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM surveys WHERE unit_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Survey>(&query)
            .bind(unit_id)
            .fetch_all(pool)
            .await
    }

    /// Update a survey. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSurvey,
    ) -> Result<Option<Survey>, sqlx::Error> {
        let questions = input
            .questions
            .as_deref()
            .map(questions_json)
            .transpose()?;
        let query = format!(
            "UPDATE surveys SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                questions = COALESCE($4, questions),
                start_time = COALESCE($5, start_time),
                duration_minutes = COALESCE($6, duration_minutes),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Survey>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(questions)
            .bind(input.start_time)
            .bind(input.duration_minutes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a survey by ID. Returns `true` if a row was deleted.
    ///
    /// Responses go with it via `ON DELETE CASCADE` on `survey_responses`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM surveys WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(survey_id = id, "survey row deleted, responses cascaded");
        }
        Ok(deleted)
    }
}

fn questions_json(questions: &[Question]) -> Result<serde_json::Value, sqlx::Error> {
    serde_json::to_value(questions).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}
