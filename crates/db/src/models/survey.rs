//! Survey entity model and DTOs.

use muster_core::question::Question;
use muster_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A survey row from the `surveys` table.
///
/// `questions` is stored as a JSONB array; use [`Survey::questions`] to get
/// the typed question list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Survey {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub unit_id: DbId,
    pub questions: serde_json::Value,
    pub start_time: Option<Timestamp>,
    pub duration_minutes: Option<i32>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Survey {
    /// Decode the JSONB question array into typed questions.
    ///
    /// Rows are only ever written through validation, so a decode failure
    /// here means the stored definition was corrupted out of band.
    pub fn questions(&self) -> Result<Vec<Question>, serde_json::Error> {
        serde_json::from_value(self.questions.clone())
    }
}

/// DTO for creating a survey. The API validates `questions` with
/// `muster_core::question::validate_questions` before this reaches storage.
#[derive(Debug, Deserialize)]
pub struct CreateSurvey {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub unit_id: DbId,
    pub questions: Vec<Question>,
    pub start_time: Option<Timestamp>,
    pub duration_minutes: Option<i32>,
}

/// DTO for updating a survey. All fields optional; `questions`, when
/// present, is re-validated in full.
#[derive(Debug, Deserialize)]
pub struct UpdateSurvey {
    pub title: Option<String>,
    pub description: Option<String>,
    pub questions: Option<Vec<Question>>,
    pub start_time: Option<Timestamp>,
    pub duration_minutes: Option<i32>,
}
