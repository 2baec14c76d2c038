//! Error type for the content generation boundary

use thiserror::Error;

/// Message shown near the topic list whenever generation fails
pub const GENERATION_FAILED_PT: &str =
    "Não foi possível gerar o exercício. Verifique sua chave API ou tente novamente.";

/// Why an exercise set could not be produced
///
/// Every variant means the same thing to the session: nothing was generated
/// and the user may pick a topic again. The variants only exist for logging.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// API key is not configured
    #[error("API key not configured. Run `falafluente key set <key>` or :key <key>")]
    ApiKeyNotFound,

    /// Failed to access system keyring
    #[error("Failed to access keyring: {0}")]
    KeyringError(String),

    /// Invalid API key format
    #[error("Invalid API key format. Key should start with 'sk-ant-'")]
    InvalidApiKey,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Rate limited by the API
    #[error("Rate limited. Retry after {retry_after_seconds} seconds")]
    RateLimited {
        /// Seconds the API asked us to wait
        retry_after_seconds: u64,
    },

    /// The response carried no exercise payload
    #[error("No content generated")]
    EmptyResponse,

    /// The payload was not valid JSON for an exercise set
    #[error("Malformed exercise JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The payload parsed but broke the exercise contract
    #[error("Generated exercise is invalid: {0}")]
    InvalidContent(String),
}

impl GenerationError {
    /// Text for the user; identical for every cause
    pub fn user_message(&self) -> &'static str {
        GENERATION_FAILED_PT
    }

    /// Check if this error requires re-authentication
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            GenerationError::ApiKeyNotFound
                | GenerationError::InvalidApiKey
                | GenerationError::ApiError { status: 401, .. }
        )
    }
}
