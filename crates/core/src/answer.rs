//! Answer values and submission-time validation.
//!
//! A response stores its answers as a JSONB mapping of question id to
//! [`AnswerValue`]. Validation runs before the row is written; a response
//! that fails any rule is rejected whole, nothing partial is stored.

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::question::Question;

/// One answer: a single string for text / single-choice / select questions,
/// a list of option strings for multi-choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    One(String),
    Many(Vec<String>),
}

impl AnswerValue {
    /// An empty string or an empty/blank selection list counts as no answer.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::One(s) => s.trim().is_empty(),
            AnswerValue::Many(values) => values.iter().all(|v| v.trim().is_empty()),
        }
    }
}

/// The answer map as stored on a response row. `BTreeMap` keeps the JSONB
/// serialization stable across runs.
pub type AnswerMap = BTreeMap<String, AnswerValue>;

/// Validate a submitted answer map against the survey's question list.
///
/// Enforces:
/// - every answer key names a declared question;
/// - answer shape matches the question kind (list answers only on
///   multi-choice);
/// - choice answers select declared options only;
/// - every `required` question has a non-empty answer.
pub fn validate_answers(questions: &[Question], answers: &AnswerMap) -> Result<(), CoreError> {
    for key in answers.keys() {
        if !questions.iter().any(|q| q.id == *key) {
            return Err(CoreError::Validation(format!(
                "Answer references unknown question '{key}'"
            )));
        }
    }

    for question in questions {
        let answer = answers.get(&question.id);

        let missing = answer.map_or(true, |a| a.is_empty());
        if question.required && missing {
            return Err(CoreError::Validation(format!(
                "Question '{}' is required",
                question.id
            )));
        }

        if let Some(answer) = answer {
            validate_shape(question, answer)?;
            validate_selection(question, answer)?;
        }
    }

    Ok(())
}

fn validate_shape(question: &Question, answer: &AnswerValue) -> Result<(), CoreError> {
    match answer {
        AnswerValue::Many(_) if !question.question_type.is_multi() => {
            Err(CoreError::Validation(format!(
                "Question '{}' takes a single answer, not a list",
                question.id
            )))
        }
        AnswerValue::One(_) if question.question_type.is_multi() => {
            Err(CoreError::Validation(format!(
                "Question '{}' takes a list of selections",
                question.id
            )))
        }
        _ => Ok(()),
    }
}

fn validate_selection(question: &Question, answer: &AnswerValue) -> Result<(), CoreError> {
    let Some(options) = &question.options else {
        return Ok(());
    };
    let declared: HashSet<&str> = options.iter().map(|o| o.as_str()).collect();

    let selected: Vec<&str> = match answer {
        AnswerValue::One(s) => vec![s.as_str()],
        AnswerValue::Many(values) => values.iter().map(|v| v.as_str()).collect(),
    };

    for value in selected {
        if value.trim().is_empty() {
            continue;
        }
        if !declared.contains(value) {
            return Err(CoreError::Validation(format!(
                "Question '{}' has no option '{}'",
                question.id, value
            )));
        }
    }

    Ok(())
}
