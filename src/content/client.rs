//! HTTP client for the Claude messages API

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use super::ContentGenerator;
use super::error::GenerationError;
use super::exercise::ExerciseSet;
use super::models::{ClaudeModel, CreateMessageRequest, Message, MessageResponse, ToolDefinition};
use super::prompt::{GenerationRequest, SYSTEM_PROMPT, build_prompt};
use super::schema::{EXERCISE_SCHEMA, EXERCISE_TOOL_DESCRIPTION, EXERCISE_TOOL_NAME};
use super::validate::validate;
use crate::catalog::Skill;

/// Low temperature keeps the teaching content accurate
pub const GENERATION_TEMPERATURE: f32 = 0.5;

/// Room for a lesson in Portuguese plus five questions
const GENERATION_MAX_TOKENS: u32 = 8192;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid fence regex"));

/// Claude API client
pub struct ClaudeClient {
    /// HTTP client
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Model used for generation
    model: ClaudeModel,
}

impl ClaudeClient {
    /// Claude API base URL
    const API_URL: &'static str = "https://api.anthropic.com/v1/messages";
    /// API version header value
    const API_VERSION: &'static str = "2023-06-01";

    /// Create a new Claude client with the given API key
    pub fn new(api_key: String, model: ClaudeModel) -> Result<Self, GenerationError> {
        let client =
            Client::builder().connect_timeout(std::time::Duration::from_secs(30)).build()?;

        Ok(Self { client, api_key, model })
    }

    pub fn model(&self) -> ClaudeModel {
        self.model
    }

    /// Build the single request sent for one generation
    pub fn build_request(&self, request: &GenerationRequest) -> CreateMessageRequest {
        let tool = ToolDefinition {
            name: EXERCISE_TOOL_NAME.to_string(),
            description: EXERCISE_TOOL_DESCRIPTION.to_string(),
            input_schema: EXERCISE_SCHEMA.clone(),
        };

        CreateMessageRequest::new(self.model, vec![Message::user(build_prompt(request))])
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(GENERATION_MAX_TOKENS)
            .with_temperature(GENERATION_TEMPERATURE)
            .with_forced_tool(tool)
    }

    /// Send a message request and return the complete response
    pub async fn send_message(
        &self,
        request: &CreateMessageRequest,
    ) -> Result<MessageResponse, GenerationError> {
        let response = self
            .client
            .post(Self::API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(GenerationError::RateLimited { retry_after_seconds: retry_after });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GenerationError::ApiError {
                status: 401,
                message: "Invalid API key".to_string(),
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiError { status: status.as_u16(), message });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl ContentGenerator for ClaudeClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<ExerciseSet, GenerationError> {
        tracing::info!(
            level = %request.level,
            skill = %request.skill,
            topic = %request.topic,
            model = self.model.model_id(),
            "Requesting exercise set"
        );

        let response = self.send_message(&self.build_request(request)).await?;
        tracing::debug!(
            id = %response.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = ?response.stop_reason,
            "Generation finished"
        );

        extract_exercise(response, request.skill)
    }
}

/// Pull the exercise set out of a response and check it
///
/// The forced tool call is the expected shape; a JSON text block (optionally
/// fenced) is accepted as a fallback.
pub fn extract_exercise(
    response: MessageResponse,
    skill: Skill,
) -> Result<ExerciseSet, GenerationError> {
    let tool_input = response
        .content
        .iter()
        .find(|b| b.block_type == "tool_use" && b.name.as_deref() == Some(EXERCISE_TOOL_NAME))
        .and_then(|b| b.input.clone())
        .filter(|input| !input.is_null());

    let set: ExerciseSet = match tool_input {
        Some(input) => serde_json::from_value(input)?,
        None => {
            let text: String = response
                .content
                .iter()
                .filter(|b| b.block_type == "text")
                .filter_map(|b| b.text.as_deref())
                .collect();
            let text = text.trim();
            if text.is_empty() {
                return Err(GenerationError::EmptyResponse);
            }
            // Bare JSON first: its strings may contain fences of their own
            match serde_json::from_str(text) {
                Ok(set) => set,
                Err(_) => {
                    let payload = strip_code_fence(text);
                    if payload.is_empty() {
                        return Err(GenerationError::EmptyResponse);
                    }
                    serde_json::from_str(payload)?
                }
            }
        }
    };

    validate(set, skill)
}

/// Return the body of the first fenced block, or the trimmed text
fn strip_code_fence(text: &str) -> &str {
    CODE_FENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text)
        .trim()
}
