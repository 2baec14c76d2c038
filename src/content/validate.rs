//! Contract checks applied to generator output before it is trusted

use std::collections::HashSet;

use super::error::GenerationError;
use super::exercise::ExerciseSet;
use super::prompt::expected_question_count;
use crate::catalog::Skill;

/// Options every question must have
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Check an exercise set against the contract for `skill`
///
/// Violations are rejected as a whole rather than patched, except for a
/// stray `readingText` on a non-Reading set, which is dropped.
pub fn validate(mut set: ExerciseSet, skill: Skill) -> Result<ExerciseSet, GenerationError> {
    let invalid = |msg: String| Err(GenerationError::InvalidContent(msg));

    if set.questions.is_empty() {
        return invalid("no questions".into());
    }

    let expected = expected_question_count(skill);
    if set.questions.len() != expected {
        return invalid(format!("expected {} questions, got {}", expected, set.questions.len()));
    }

    let mut ids = HashSet::new();
    for question in &set.questions {
        if !ids.insert(question.id) {
            return invalid(format!("duplicate question id {}", question.id));
        }
        if question.question_text.trim().is_empty() {
            return invalid(format!("question {} has no text", question.id));
        }
        if question.options.len() != OPTIONS_PER_QUESTION {
            return invalid(format!(
                "question {} has {} options",
                question.id,
                question.options.len()
            ));
        }
        if question.correct_answer_index >= question.options.len() {
            return invalid(format!(
                "question {} has correctAnswerIndex {} out of range",
                question.id, question.correct_answer_index
            ));
        }
    }

    let has_text = set.reading_text.as_deref().is_some_and(|t| !t.trim().is_empty());
    if skill == Skill::Reading {
        if !has_text {
            return invalid("reading exercise without readingText".into());
        }
    } else if set.reading_text.is_some() {
        if has_text {
            tracing::warn!("Dropping readingText from a {} exercise", skill);
        }
        set.reading_text = None;
    }

    Ok(set)
}
