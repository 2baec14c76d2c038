//! Generated lesson + quiz bundle

use serde::{Deserialize, Serialize};

/// One generated exercise: lesson content followed by a quiz
///
/// Immutable once received; the session replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    pub title: String,
    pub instructions: String,
    pub lesson: Lesson,
    pub questions: Vec<Question>,
    /// Passage for Reading exercises; absent otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_text: Option<String>,
}

impl ExerciseSet {
    /// Look up a question by its id
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Reading passage split into paragraphs, blank lines dropped
    pub fn reading_paragraphs(&self) -> Vec<&str> {
        self.reading_text
            .as_deref()
            .map(|text| text.lines().map(str::trim).filter(|p| !p.is_empty()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Short introduction, in Portuguese
    pub intro: String,
    pub sections: Vec<LessonSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSection {
    pub title: String,
    /// Explanation, in Portuguese
    pub content: String,
    /// English examples, usually with a translation in parentheses
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation_pt: String,
}

impl Question {
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer_index
    }
}
