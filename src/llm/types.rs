//! Wire types for the chat-completion boundary and the schema-constrained
//! correction response.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single request to the language model: system/user pair, sampling
/// settings, and whether the response must be one well-formed JSON object.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub require_json: bool,
}

/// Structured response contract for the evaluator/corrector. Preferred over
/// scanning labeled text lines; the line form remains a fallback parse.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CorrectionResponse {
    #[schemars(
        description = "The corrected inventory item name in 'Core Item, Descriptors' form, 2-4 words, core item first"
    )]
    pub final_corrected_name: String,

    #[schemars(description = "Brief explanation of what was changed and why")]
    pub explanation: String,
}

impl CorrectionResponse {
    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(CorrectionResponse);
        serde_json::to_string_pretty(&schema)
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}
