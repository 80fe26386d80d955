//! Survey response entity model.

use muster_core::answer::AnswerMap;
use muster_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A response row from the `survey_responses` table. Append-only: rows are
/// created at submission and never mutated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SurveyResponse {
    pub id: DbId,
    pub survey_id: DbId,
    pub user_id: DbId,
    pub answers: serde_json::Value,
    pub created_at: Timestamp,
}

impl SurveyResponse {
    /// Decode the JSONB answer map into typed answers.
    pub fn answers(&self) -> Result<AnswerMap, serde_json::Error> {
        serde_json::from_value(self.answers.clone())
    }
}

/// A response row joined with the submitter's email, used by the admin
/// responses listing and by aggregation input assembly.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResponseWithRespondent {
    pub id: DbId,
    pub survey_id: DbId,
    pub user_id: DbId,
    pub email: String,
    pub answers: serde_json::Value,
    pub created_at: Timestamp,
}

impl ResponseWithRespondent {
    /// Decode the JSONB answer map into typed answers.
    pub fn answers(&self) -> Result<AnswerMap, serde_json::Error> {
        serde_json::from_value(self.answers.clone())
    }
}
