use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use serde::{Deserialize, Serialize};
use tracing::debug;

use horadric_config::VisionConfig;
use horadric_core::{RequestError, TokenUsage, VisionProvider, VisionRequest, VisionResponse};
use horadric_logging::redact_sensitive_data;

/// Longest slice of an error body kept in error messages.
const ERROR_BODY_LIMIT: usize = 300;

/// Any endpoint speaking the OpenAI chat-completions dialect (OpenAI, Groq,
/// OpenRouter, local gateways).
pub struct OpenAiCompatProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiCompatProvider {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout,
        })
    }

    pub fn from_config(config: &VisionConfig) -> Result<Self> {
        Self::new(&config.endpoint, &config.api_key, config.request_timeout())
    }

    fn map_transport_error(&self, err: reqwest::Error) -> RequestError {
        if err.is_timeout() {
            RequestError::Timeout(self.timeout)
        } else {
            RequestError::Transport(redact_sensitive_data(&err.to_string()))
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
    model: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    total_tokens: Option<u64>,
}

fn build_body(request: &VisionRequest) -> ChatRequest<'_> {
    ChatRequest {
        model: &request.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: MessageContent::Text(&request.system_prompt),
            },
            ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::Text { text: &request.user_prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: &request.image_data_uri },
                    },
                ]),
            },
        ],
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

/// Parsed success body: text, usage, and the model the provider reports.
pub(crate) struct Completion {
    pub content: String,
    pub usage: Option<TokenUsage>,
    pub model: Option<String>,
}

/// Pull the first choice's text out of a 2xx body.
pub(crate) fn parse_completion(body: &str) -> Result<Completion, RequestError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| RequestError::Malformed(format!("invalid JSON body: {e}")))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| RequestError::Malformed("response has no choices".into()))?
        .message
        .content
        .unwrap_or_default();

    let content = content.trim().to_string();
    if content.is_empty() {
        return Err(RequestError::Malformed("empty message content".into()));
    }

    Ok(Completion {
        content,
        usage: response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
        model: response.model,
    })
}

/// `Retry-After` in delta-seconds. HTTP-date values are ignored.
pub(crate) fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn error_excerpt(body: &str) -> String {
    let redacted = redact_sensitive_data(body.trim());
    match redacted.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((cut, _)) => format!("{}...", &redacted[..cut]),
        None => redacted,
    }
}

#[async_trait]
impl VisionProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn extract_text(&self, request: &VisionRequest) -> Result<VisionResponse, RequestError> {
        let start = Instant::now();
        let body = build_body(request);

        debug!(model = %request.model, endpoint = %self.endpoint, "Sending vision request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);

        let text = response.text().await.map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(RequestError::from_status(
                status.as_u16(),
                error_excerpt(&text),
                retry_after,
            ));
        }

        let completion = parse_completion(&text)?;
        let latency_ms = start.elapsed().as_millis() as u64;

        Ok(VisionResponse {
            content: completion.content,
            model: completion.model.unwrap_or_else(|| request.model.clone()),
            usage: completion.usage,
            latency_ms,
        })
    }
}
