use async_trait::async_trait;
use presence_common::{PresenceError, Stage};
use presence_http::HttpError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("API error: {0}")]
    Api(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Content blocked: {0}")]
    Blocked(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<LlmError> for PresenceError {
    fn from(err: LlmError) -> Self {
        PresenceError::upstream(Stage::Summarize, err.to_string())
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response to the given prompt with optional system prompt
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse, LlmError>;

    /// Get the model name being used
    fn model_name(&self) -> &str;
}
