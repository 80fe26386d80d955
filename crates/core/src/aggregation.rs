//! Response aggregation: per-question statistical summaries.
//!
//! `aggregate` is a pure function over a survey's question list and its
//! response set. It never fails on malformed historical data: answers that
//! no longer line up with the current question set (schema drift) are
//! dropped from the affected question, and the rest of the report is still
//! produced. A partial report beats no report when an admin is reviewing
//! drill results.

use indexmap::IndexMap;
use serde::Serialize;

use crate::answer::{AnswerMap, AnswerValue};
use crate::question::{Question, QuestionType};
use crate::types::Timestamp;

/// Whether text recaps carry the respondent's identity.
///
/// Applied uniformly to the whole report; the deployment picks one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityPolicy {
    /// Pair each text answer with the submitter's display identity.
    Named,
    /// Strip respondent identity from text recaps.
    Anonymous,
}

/// One response as the engine consumes it: display identity, submission
/// time, and the typed answer map. The caller sorts rows out of storage;
/// the engine re-sorts defensively so its output is input-order invariant.
#[derive(Debug, Clone)]
pub struct ResponseInput {
    /// Display identity of the submitter (email in practice).
    pub respondent: String,
    pub created_at: Timestamp,
    pub answers: AnswerMap,
}

/// One collected text answer, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEntry {
    pub answer: String,
    /// `None` under [`IdentityPolicy::Anonymous`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respondent: Option<String>,
}

/// Occurrence count and share for one option of a choice question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionCount {
    pub option: String,
    pub count: u64,
    /// Share of `total_selections`, rounded to one decimal place.
    pub percentage: f64,
}

/// The summary body, shaped by the question kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionSummary {
    Text { entries: Vec<TextEntry> },
    Choice {
        options: Vec<OptionCount>,
        total_selections: u64,
    },
}

/// Per-question slice of the report.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionReport {
    pub question_id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub answered: u64,
    pub summary: QuestionSummary,
}

/// The full aggregation result for one survey.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyReport {
    pub response_count: u64,
    pub questions: Vec<QuestionReport>,
}

/// Aggregate a response set into a per-question report.
///
/// Deterministic for a given input set and invariant under input
/// reordering: responses are sorted by `created_at` (ties by respondent)
/// before any per-question work.
pub fn aggregate(
    questions: &[Question],
    responses: &[ResponseInput],
    identity: IdentityPolicy,
) -> SurveyReport {
    let mut ordered: Vec<&ResponseInput> = responses.iter().collect();
    ordered.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.respondent.cmp(&b.respondent))
    });

    let questions = questions
        .iter()
        .map(|q| aggregate_question(q, &ordered, identity))
        .collect();

    SurveyReport {
        response_count: responses.len() as u64,
        questions,
    }
}

fn aggregate_question(
    question: &Question,
    ordered: &[&ResponseInput],
    identity: IdentityPolicy,
) -> QuestionReport {
    // Non-response is excluded, not counted as an empty answer.
    let collected: Vec<(&ResponseInput, &AnswerValue)> = ordered
        .iter()
        .filter_map(|r| {
            r.answers
                .get(&question.id)
                .filter(|a| !a.is_empty())
                .map(|a| (*r, a))
        })
        .collect();

    let answered = collected.len() as u64;

    let summary = match question.question_type {
        QuestionType::Text => summarize_text(&collected, identity),
        QuestionType::SingleChoice | QuestionType::MultiChoice | QuestionType::Select => {
            summarize_choice(question, &collected)
        }
    };

    QuestionReport {
        question_id: question.id.clone(),
        text: question.text.clone(),
        question_type: question.question_type,
        answered,
        summary,
    }
}

fn summarize_text(
    collected: &[(&ResponseInput, &AnswerValue)],
    identity: IdentityPolicy,
) -> QuestionSummary {
    let entries = collected
        .iter()
        .map(|(response, answer)| {
            // A list answered to a text question is schema drift; flatten
            // rather than drop the respondent's words.
            let answer = match answer {
                AnswerValue::One(s) => s.clone(),
                AnswerValue::Many(values) => values.join(", "),
            };
            let respondent = match identity {
                IdentityPolicy::Named => Some(response.respondent.clone()),
                IdentityPolicy::Anonymous => None,
            };
            TextEntry { answer, respondent }
        })
        .collect();

    QuestionSummary::Text { entries }
}

fn summarize_choice(
    question: &Question,
    collected: &[(&ResponseInput, &AnswerValue)],
) -> QuestionSummary {
    // Seed from the declared options so never-selected options still appear
    // with count 0, in declaration order. Unknown historical option strings
    // (schema drift) still count and append after the declared set.
    let mut counts: IndexMap<String, u64> = IndexMap::new();
    if let Some(options) = &question.options {
        for option in options {
            counts.entry(option.clone()).or_insert(0);
        }
    }

    for (_, answer) in collected {
        let selections: Vec<&str> = match answer {
            AnswerValue::One(s) => vec![s.as_str()],
            AnswerValue::Many(values) => values.iter().map(|v| v.as_str()).collect(),
        };
        for selection in selections {
            if selection.trim().is_empty() {
                continue;
            }
            *counts.entry(selection.to_string()).or_insert(0) += 1;
        }
    }

    let total_selections: u64 = counts.values().sum();

    // No selections at all: empty distribution, no fabricated 0% rows.
    if total_selections == 0 {
        return QuestionSummary::Choice {
            options: Vec::new(),
            total_selections: 0,
        };
    }

    // Percentages are shares of total selections, not of response count: a
    // multi-choice respondent may select 0, 1, or many options, so the
    // response count is the wrong denominator.
    let options = counts
        .into_iter()
        .map(|(option, count)| OptionCount {
            option,
            count,
            percentage: round_percentage(count, total_selections),
        })
        .collect();

    QuestionSummary::Choice {
        options,
        total_selections,
    }
}

/// `count / total * 100`, rounded to one decimal place.
fn round_percentage(count: u64, total: u64) -> f64 {
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}
