//! Content generation client
//!
//! Turns a (level, skill, topic) triple into a prompt, asks Claude for a
//! structured exercise set through a forced tool call, and checks the result
//! against the exercise contract before handing it to the session.

pub mod auth;
pub mod client;
pub mod error;
pub mod exercise;
pub mod models;
pub mod prompt;
pub mod schema;
pub mod validate;

use std::future::Future;

pub use auth::{API_KEY_ENV, ApiKeyManager};
pub use client::ClaudeClient;
pub use error::GenerationError;
pub use exercise::{ExerciseSet, Lesson, LessonSection, Question};
pub use models::ClaudeModel;
pub use prompt::{GenerationRequest, build_prompt, expected_question_count};

/// Something that can produce an exercise set for a request
///
/// One call is one outbound request: no caching, no retries. Repeated calls
/// with the same request may return different content.
pub trait ContentGenerator {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<ExerciseSet, GenerationError>> + Send;
}
