use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::error::{NormalizerError, Result};
use crate::llm::types::{
    ChatCompletionPayload, ChatCompletionResponse, ChatMessage, CompletionRequest, ResponseFormat,
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// The chat-completion boundary. Implemented over a real endpoint in
/// production and by deterministic stubs in tests.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Chat-completion client for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    /// Point the client at a compatible non-default endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ChatCompleter for OpenAiChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = ChatCompletionPayload {
            model: request.model.clone(),
            messages: vec![
                ChatMessage::system(request.system.as_str()),
                ChatMessage::user(request.user.as_str()),
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.require_json.then(ResponseFormat::json_object),
        };

        debug!(
            "Sending chat completion to {} (model {}, json: {})",
            url, request.model, request.require_json
        );

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(NormalizerError::ChatCompletion(format!(
                "API error (status {}): {}",
                status, err_text
            )));
        }

        let body: ChatCompletionResponse = res.json().await?;
        let content = body
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| NormalizerError::ChatCompletion("no choices returned".to_string()))?;

        Ok(content.trim().to_string())
    }
}
