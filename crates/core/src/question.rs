//! Survey question types and definition-time validation.
//!
//! Questions live inside a survey as an ordered JSONB array; the shape of a
//! question decides which answer values are acceptable and how responses are
//! aggregated. Validation here runs at survey create/update time so that an
//! invalid definition never reaches storage.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The kind of a survey question.
///
/// `Text` takes a free-form string answer; the three choice kinds take one or
/// more of the declared options. `SingleChoice` and `Select` differ only in
/// how the (absent) frontend renders them, so the core treats them alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Text,
    SingleChoice,
    MultiChoice,
    Select,
}

impl QuestionType {
    /// Whether this question kind carries a declared option list.
    pub fn has_options(self) -> bool {
        !matches!(self, QuestionType::Text)
    }

    /// Whether an answer to this question may select multiple options.
    pub fn is_multi(self) -> bool {
        matches!(self, QuestionType::MultiChoice)
    }
}

/// A single question in a survey definition.
///
/// `id` is unique within the survey (client-assigned, opaque to the core).
/// `options` order is display order and is preserved through aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub required: bool,
}

/// Minimum number of distinct options on a choice question.
pub const MIN_CHOICE_OPTIONS: usize = 2;

/// Validate a survey's question list at definition time.
///
/// Enforces:
/// - at least one question;
/// - question ids non-empty and unique within the survey;
/// - question text non-empty;
/// - choice questions carry at least [`MIN_CHOICE_OPTIONS`] distinct,
///   non-empty options;
/// - text questions carry no options.
pub fn validate_questions(questions: &[Question]) -> Result<(), CoreError> {
    if questions.is_empty() {
        return Err(CoreError::Validation(
            "A survey must contain at least one question".into(),
        ));
    }

    let mut seen_ids: HashSet<&str> = HashSet::with_capacity(questions.len());

    for q in questions {
        if q.id.trim().is_empty() {
            return Err(CoreError::Validation("Question id must not be empty".into()));
        }
        if !seen_ids.insert(q.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate question id '{}'",
                q.id
            )));
        }
        if q.text.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Question '{}' has empty text",
                q.id
            )));
        }

        match (&q.options, q.question_type.has_options()) {
            (Some(options), true) => validate_options(&q.id, options)?,
            (None, true) => {
                return Err(CoreError::Validation(format!(
                    "Question '{}' is a choice question but declares no options",
                    q.id
                )));
            }
            (Some(_), false) => {
                return Err(CoreError::Validation(format!(
                    "Question '{}' is a text question and must not declare options",
                    q.id
                )));
            }
            (None, false) => {}
        }
    }

    Ok(())
}

fn validate_options(question_id: &str, options: &[String]) -> Result<(), CoreError> {
    let distinct: HashSet<&str> = options
        .iter()
        .map(|o| o.as_str())
        .filter(|o| !o.trim().is_empty())
        .collect();

    if distinct.len() < MIN_CHOICE_OPTIONS {
        return Err(CoreError::Validation(format!(
            "Question '{question_id}' must declare at least {MIN_CHOICE_OPTIONS} distinct options"
        )));
    }
    if options.iter().any(|o| o.trim().is_empty()) {
        return Err(CoreError::Validation(format!(
            "Question '{question_id}' has an empty option"
        )));
    }

    Ok(())
}
