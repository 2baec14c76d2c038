//! Data models for Claude API requests and responses

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Available Claude models
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClaudeModel {
    /// Claude Haiku 4.5 - fast and cost-effective
    #[default]
    Haiku45,
    /// Claude Sonnet 4 - capable
    Sonnet4,
    /// Claude Sonnet 4.5 - latest Sonnet
    Sonnet45,
    /// Claude Opus 4.5 - most capable
    Opus45,
}

impl ClaudeModel {
    /// Get the API model identifier
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Haiku45 => "claude-haiku-4-5-20251001",
            Self::Sonnet4 => "claude-sonnet-4-20250514",
            Self::Sonnet45 => "claude-sonnet-4-5-20250929",
            Self::Opus45 => "claude-opus-4-5-20251101",
        }
    }

    /// Get a human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Haiku45 => "Claude Haiku 4.5",
            Self::Sonnet4 => "Claude Sonnet 4",
            Self::Sonnet45 => "Claude Sonnet 4.5",
            Self::Opus45 => "Claude Opus 4.5",
        }
    }

    /// Parse model from a short name or a model ID
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "haiku" | "haiku45" | "haiku4.5" => Some(Self::Haiku45),
            "sonnet4" => Some(Self::Sonnet4),
            "sonnet" | "sonnet45" | "sonnet4.5" => Some(Self::Sonnet45),
            "opus" | "opus45" | "opus4.5" => Some(Self::Opus45),
            id => Self::all().iter().copied().find(|m| m.model_id() == id),
        }
    }

    /// List all available models
    pub fn all() -> &'static [ClaudeModel] {
        &[Self::Haiku45, Self::Sonnet4, Self::Sonnet45, Self::Opus45]
    }
}

impl std::str::FromStr for ClaudeModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| format!("Unknown model: {}. Options: haiku, sonnet4, sonnet, opus", s))
    }
}

/// Message role in conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Tool offered to the model; its `input_schema` shapes the output
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Forces the model to answer through one named tool
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToolChoice {
    #[serde(rename = "type")]
    pub choice_type: String,
    pub name: String,
}

impl ToolChoice {
    pub fn tool(name: impl Into<String>) -> Self {
        Self { choice_type: "tool".to_string(), name: name.into() }
    }
}

/// Request body for Claude messages API
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl CreateMessageRequest {
    /// Create a new request with default settings
    pub fn new(model: ClaudeModel, messages: Vec<Message>) -> Self {
        Self {
            model: model.model_id().to_string(),
            max_tokens: 4096,
            messages,
            system: None,
            temperature: None,
            tools: Vec::new(),
            tool_choice: None,
        }
    }

    /// Set the system prompt
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Offer a single tool and force the model to call it
    pub fn with_forced_tool(mut self, tool: ToolDefinition) -> Self {
        self.tool_choice = Some(ToolChoice::tool(tool.name.clone()));
        self.tools = vec![tool];
        self
    }
}

/// Non-streaming response from Claude API
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Usage,
}

/// Content block in response
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    /// Block type ("text" or "tool_use")
    #[serde(rename = "type")]
    pub block_type: String,
    /// Text content, for text blocks
    pub text: Option<String>,
    /// Tool name, for tool_use blocks
    pub name: Option<String>,
    /// Tool arguments, for tool_use blocks
    pub input: Option<Value>,
}

/// Token usage statistics
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_parse() {
        assert_eq!(ClaudeModel::parse("haiku"), Some(ClaudeModel::Haiku45));
        assert_eq!(ClaudeModel::parse("sonnet4"), Some(ClaudeModel::Sonnet4));
        assert_eq!(ClaudeModel::parse("sonnet"), Some(ClaudeModel::Sonnet45));
        assert_eq!(ClaudeModel::parse("OPUS"), Some(ClaudeModel::Opus45));
        assert_eq!(ClaudeModel::parse("claude-sonnet-4-20250514"), Some(ClaudeModel::Sonnet4));
        assert_eq!(ClaudeModel::parse("unknown"), None);
    }

    #[test]
    fn forced_tool_request_serializes() {
        let tool = ToolDefinition {
            name: "record".into(),
            description: "d".into(),
            input_schema: serde_json::json!({"type": "object"}),
        };
        let request = CreateMessageRequest::new(ClaudeModel::Haiku45, vec![Message::user("Hi")])
            .with_system("teacher")
            .with_temperature(0.5)
            .with_forced_tool(tool);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-haiku-4-5-20251001");
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["tool_choice"]["type"], "tool");
        assert_eq!(json["tool_choice"]["name"], "record");
        assert_eq!(json["tools"][0]["input_schema"]["type"], "object");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn plain_request_omits_optional_fields() {
        let request = CreateMessageRequest::new(ClaudeModel::Haiku45, vec![Message::user("Hi")]);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none());
        assert!(json.get("tool_choice").is_none());
        assert!(json.get("temperature").is_none());
        assert!(json.get("system").is_none());
    }

    #[test]
    fn tool_use_block_deserializes() {
        let json = r#"{"type":"tool_use","id":"toolu_1","name":"record","input":{"a":1}}"#;
        let block: ContentBlock = serde_json::from_str(json).unwrap();
        assert_eq!(block.block_type, "tool_use");
        assert_eq!(block.name.as_deref(), Some("record"));
        assert_eq!(block.input.unwrap()["a"], 1);
        assert!(block.text.is_none());
    }
}
