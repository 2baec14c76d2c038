//! Quiz answers, submission and scoring

use std::collections::{BTreeMap, BTreeSet};

use super::SessionError;
use crate::content::{ExerciseSet, Question};

/// Outcome of a submitted quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
}

impl QuizResult {
    /// Score as a whole percentage
    pub fn percentage(&self) -> usize {
        if self.total == 0 { 0 } else { self.score * 100 / self.total }
    }

    pub fn message(&self) -> ScoreMessage {
        // score / total >= 0.8 without floating point
        if self.total > 0 && self.score * 5 >= self.total * 4 {
            ScoreMessage::Positive
        } else {
            ScoreMessage::Encouragement
        }
    }

    pub fn band(&self) -> ScoreBand {
        let scaled = self.score * 100;
        if self.total == 0 {
            ScoreBand::Poor
        } else if scaled >= self.total * 80 {
            ScoreBand::Good
        } else if scaled >= self.total * 50 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }
}

/// Qualitative message shown with the score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMessage {
    Positive,
    Encouragement,
}

impl ScoreMessage {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Positive => "Excelente trabalho! 🎉",
            Self::Encouragement => "Continue praticando! 💪",
        }
    }
}

/// Coarse score bucket, used for coloring the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

/// How an option should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// Not chosen, before submission
    Idle,
    /// Chosen, before submission
    Selected,
    /// The correct option, after submission
    Correct,
    /// Chosen but wrong, after submission
    Wrong,
    /// Neither chosen nor correct, after submission
    Dimmed,
}

/// Count questions whose chosen option is the correct one
pub fn score(exercise: &ExerciseSet, answers: &BTreeMap<u32, usize>) -> usize {
    exercise
        .questions
        .iter()
        .filter(|q| answers.get(&q.id).is_some_and(|&chosen| q.is_correct(chosen)))
        .count()
}

/// Answers for the current exercise and, once submitted, the frozen result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizState {
    answers: BTreeMap<u32, usize>,
    result: Option<QuizResult>,
}

impl QuizState {
    /// Record a choice, replacing any earlier one for the same question
    pub fn answer(
        &mut self,
        exercise: &ExerciseSet,
        question_id: u32,
        option: usize,
    ) -> Result<(), SessionError> {
        if self.result.is_some() {
            return Err(SessionError::QuizSubmitted);
        }
        let question =
            exercise.question(question_id).ok_or(SessionError::UnknownQuestion(question_id))?;
        if option >= question.options.len() {
            return Err(SessionError::OptionOutOfRange { question: question_id, option });
        }
        self.answers.insert(question_id, option);
        Ok(())
    }

    pub fn selected(&self, question_id: u32) -> Option<usize> {
        self.answers.get(&question_id).copied()
    }

    pub fn answers(&self) -> &BTreeMap<u32, usize> {
        &self.answers
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// True when every question has an answer and nothing was submitted yet
    pub fn can_submit(&self, exercise: &ExerciseSet) -> bool {
        if self.result.is_some() {
            return false;
        }
        let answered: BTreeSet<u32> = self.answers.keys().copied().collect();
        let all: BTreeSet<u32> = exercise.questions.iter().map(|q| q.id).collect();
        !all.is_empty() && answered == all
    }

    /// Score the quiz and freeze further edits
    ///
    /// Submitting again returns the stored result unchanged.
    pub fn submit(&mut self, exercise: &ExerciseSet) -> Result<QuizResult, SessionError> {
        if let Some(result) = self.result {
            return Ok(result);
        }
        if !self.can_submit(exercise) {
            return Err(SessionError::QuizIncomplete {
                answered: self.answers.len(),
                total: exercise.questions.len(),
            });
        }
        let result =
            QuizResult { score: score(exercise, &self.answers), total: exercise.questions.len() };
        self.result = Some(result);
        Ok(result)
    }

    pub fn result(&self) -> Option<QuizResult> {
        self.result
    }

    pub fn is_submitted(&self) -> bool {
        self.result.is_some()
    }

    pub fn option_mark(&self, question: &Question, option: usize) -> OptionMark {
        let selected = self.selected(question.id) == Some(option);
        match (self.is_submitted(), selected, question.is_correct(option)) {
            (false, true, _) => OptionMark::Selected,
            (false, false, _) => OptionMark::Idle,
            (true, _, true) => OptionMark::Correct,
            (true, true, false) => OptionMark::Wrong,
            (true, false, false) => OptionMark::Dimmed,
        }
    }
}
