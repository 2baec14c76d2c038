//! JSON Schema the generator's output must satisfy

use once_cell::sync::Lazy;
use serde_json::{Value, json};

/// Name of the single tool the model is forced to call
pub const EXERCISE_TOOL_NAME: &str = "record_exercise_set";

/// Description attached to the tool definition
pub const EXERCISE_TOOL_DESCRIPTION: &str =
    "Record the generated lesson and multiple-choice exercise set for the student.";

/// Structural schema of an exercise set, in wire (camelCase) names
pub static EXERCISE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "A catchy title for the exercise set."
            },
            "instructions": {
                "type": "string",
                "description": "Instructions for the student."
            },
            "readingText": {
                "type": "string",
                "description": "A short text/story if the skill is Reading. Omit otherwise."
            },
            "lesson": {
                "type": "object",
                "description": "Educational content explaining the topic before the quiz.",
                "properties": {
                    "intro": {
                        "type": "string",
                        "description": "A brief introduction to the topic in Portuguese."
                    },
                    "sections": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "title": {
                                    "type": "string",
                                    "description": "Title of the grammar rule or concept."
                                },
                                "content": {
                                    "type": "string",
                                    "description": "Explanation of the rule in Portuguese. Use simple formatting."
                                },
                                "examples": {
                                    "type": "array",
                                    "items": { "type": "string" },
                                    "description": "English examples with Portuguese translations in parentheses."
                                }
                            },
                            "required": ["title", "content", "examples"]
                        }
                    }
                },
                "required": ["intro", "sections"]
            },
            "questions": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "questionText": {
                            "type": "string",
                            "description": "The question or sentence with a blank."
                        },
                        "options": {
                            "type": "array",
                            "items": { "type": "string" },
                            "minItems": 4,
                            "maxItems": 4,
                            "description": "Exactly 4 possible answers."
                        },
                        "correctAnswerIndex": {
                            "type": "integer",
                            "minimum": 0,
                            "maximum": 3,
                            "description": "Index of the correct option (0-3)."
                        },
                        "explanationPt": {
                            "type": "string",
                            "description": "Explanation of why the answer is correct, written in Portuguese."
                        }
                    },
                    "required": ["id", "questionText", "options", "correctAnswerIndex", "explanationPt"]
                }
            }
        },
        "required": ["title", "instructions", "questions", "lesson"]
    })
});
