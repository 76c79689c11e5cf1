use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use horadric_core::{RequestError, VisionProvider, VisionRequest, VisionResponse};

/// A mock vision provider that replays scripted results, then a fixed response.
pub struct MockVisionProvider {
    name: String,
    script: Mutex<VecDeque<Result<String, RequestError>>>,
    fixed_response: Option<String>,
    calls: AtomicU32,
}

impl MockVisionProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            fixed_response: None,
            calls: AtomicU32::new(0),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    /// Results returned in order before falling back to the fixed response.
    pub fn with_script(self, script: impl IntoIterator<Item = Result<String, RequestError>>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(script);
        self
    }

    /// Number of `extract_text` calls made so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn extract_text(&self, request: &VisionRequest) -> Result<VisionResponse, RequestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        let content = match scripted {
            Some(result) => result?,
            None => self
                .fixed_response
                .clone()
                .ok_or_else(|| RequestError::Malformed("mock has no response".into()))?,
        };

        Ok(VisionResponse {
            content,
            model: request.model.clone(),
            usage: None,
            latency_ms: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horadric_core::RequestTemplate;

    fn request() -> VisionRequest {
        RequestTemplate {
            model: "mock".into(),
            system_prompt: String::new(),
            user_prompt: String::new(),
            max_tokens: 16,
            temperature: 0.0,
        }
        .with_image("data:image/png;base64,".into())
    }

    #[tokio::test]
    async fn replays_script_then_fixed() {
        let mock = MockVisionProvider::new("mock")
            .with_script([Err(RequestError::Timeout(Default::default())), Ok("first".into())])
            .with_response("fixed");

        assert!(mock.extract_text(&request()).await.is_err());
        assert_eq!(mock.extract_text(&request()).await.unwrap().content, "first");
        assert_eq!(mock.extract_text(&request()).await.unwrap().content, "fixed");
        assert_eq!(mock.calls(), 3);
    }
}
