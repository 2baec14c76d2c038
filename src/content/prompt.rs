//! Natural-language instructions for the generator

use crate::catalog::{Level, Skill};

/// The triple one generation is made from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub level: Level,
    pub skill: Skill,
    /// Topic display name, e.g. "Modal Verbs"
    pub topic: String,
}

impl GenerationRequest {
    pub fn new(level: Level, skill: Skill, topic: impl Into<String>) -> Self {
        Self { level, skill, topic: topic.into() }
    }
}

/// System prompt shared by both branches
pub const SYSTEM_PROMPT: &str = "You are an experienced English teacher for Brazilian \
Portuguese speakers. You always answer by calling the provided tool with a complete \
exercise set. Explanations aimed at the student are written in Brazilian Portuguese; \
examples and quiz items are in English.";

/// How many questions a generation must contain
pub fn expected_question_count(skill: Skill) -> usize {
    if skill == Skill::Reading { 4 } else { 5 }
}

/// Build the user prompt for a request
pub fn build_prompt(request: &GenerationRequest) -> String {
    let GenerationRequest { level, skill, topic } = request;
    let count = expected_question_count(*skill);

    if *skill == Skill::Reading {
        format!(
            "Create a Reading Comprehension lesson and exercise for Level {level} students.
Topic: {topic}.
Target Audience: Brazilian Portuguese speakers learning English.
1. READING TEXT: Generate a short text (approx 150-200 words) appropriate for {level} level and put it in readingText.
2. LESSON: Provide a brief guide on reading strategies or vocabulary used in the text (in Portuguese).
3. EXERCISE: Create exactly {count} multiple choice questions based on the text, each with exactly 4 options.
4. EXPLANATION: The explanationPt for questions must be in Portuguese."
        )
    } else {
        format!(
            "Create a {skill} lesson and exercise set for Level {level} students.
Topic: {topic}.
Target Audience: Brazilian Portuguese speakers learning English.

PART 1: THE LESSON (In Portuguese)
- Explain the grammar rules or vocabulary usage clearly.
- Break it down into 2-3 logical sections (e.g., \"Affirmative Form\", \"Negative Form\", \"Common Mistakes\").
- HIGHLIGHT common mistakes Brazilians make (e.g., False Cognates, prepositions).
- Provide clear examples.

PART 2: THE EXERCISE
- Create exactly {count} multiple choice questions, each with exactly 4 options.
- Number the question ids from 1.
- The explanationPt for each question must be in Portuguese.
- Do not include readingText."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_prompt_asks_for_passage_and_four_questions() {
        let prompt = build_prompt(&GenerationRequest::new(Level::A2, Skill::Reading, "Travel"));
        assert!(prompt.contains("Reading Comprehension"));
        assert!(prompt.contains("150-200 words"));
        assert!(prompt.contains("exactly 4 multiple choice questions"));
        assert!(prompt.contains("Level A2"));
        assert!(prompt.contains("Topic: Travel."));
    }

    #[test]
    fn lesson_prompt_asks_for_sections_and_five_questions() {
        let prompt =
            build_prompt(&GenerationRequest::new(Level::B1Plus, Skill::Grammar, "Modal Verbs"));
        assert!(prompt.contains("Create a Grammar lesson"));
        assert!(prompt.contains("Level B1+"));
        assert!(prompt.contains("2-3 logical sections"));
        assert!(prompt.contains("common mistakes Brazilians make"));
        assert!(prompt.contains("exactly 5 multiple choice questions"));
        assert!(!prompt.contains("150-200 words"));
    }

    #[test]
    fn both_branches_require_portuguese_explanations() {
        for skill in Skill::offered() {
            let prompt = build_prompt(&GenerationRequest::new(Level::C1, *skill, "Passive Voice"));
            assert!(prompt.contains("explanationPt"), "{skill}");
            assert!(prompt.contains("Portuguese"), "{skill}");
        }
    }

    #[test]
    fn use_of_english_uses_english_skill_name() {
        let prompt =
            build_prompt(&GenerationRequest::new(Level::B2, Skill::UseOfEnglish, "Business"));
        assert!(prompt.contains("Create a Use of English lesson"));
    }

    #[test]
    fn question_counts() {
        assert_eq!(expected_question_count(Skill::Reading), 4);
        assert_eq!(expected_question_count(Skill::Grammar), 5);
        assert_eq!(expected_question_count(Skill::Vocabulary), 5);
        assert_eq!(expected_question_count(Skill::UseOfEnglish), 5);
    }
}
