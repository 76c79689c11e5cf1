use async_trait::async_trait;

use crate::error::RequestError;
use crate::types::TokenUsage;

/// Anything that can turn one encoded screenshot into tooltip text.
///
/// Implementations make exactly one attempt per call; retries, backoff and
/// rate limiting live in the scheduler.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name (e.g., "openai-compatible", "mock").
    fn name(&self) -> &str;

    /// Send one chat-completion request carrying the image.
    async fn extract_text(&self, request: &VisionRequest) -> Result<VisionResponse, RequestError>;
}

/// Fixed per-run request settings; only the image changes between calls.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl RequestTemplate {
    pub fn with_image(&self, image_data_uri: String) -> VisionRequest {
        VisionRequest {
            model: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
            user_prompt: self.user_prompt.clone(),
            image_data_uri,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Request to a vision provider.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    /// `data:<mime>;base64,<payload>`
    pub image_data_uri: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Response from a vision provider.
#[derive(Debug, Clone)]
pub struct VisionResponse {
    pub content: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
    pub latency_ms: u64,
}
