//! Anthropic Messages API client.

use super::http::HttpTransport;
use super::{
    ChatMessage, CompletionOptions, CompletionResponse, MessageRole, ModelProviderClient,
    TokenUsage,
};
use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const FALLBACK_MAX_TOKENS: u32 = 1024;
const TEMPERATURE_CEILING: f32 = 1.0;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<&'a ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<&'a [String]>,
}

impl<'a> MessagesRequest<'a> {
    /// System turns move to the top-level `system` field; the rest stay in order.
    fn new(model: &'a str, messages: &'a [ChatMessage], options: &'a CompletionOptions) -> Self {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();

        Self {
            model,
            max_tokens: options.max_tokens.unwrap_or(FALLBACK_MAX_TOKENS),
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            messages: messages
                .iter()
                .filter(|m| m.role != MessageRole::System)
                .collect(),
            temperature: options.temperature.map(|t| t.min(TEMPERATURE_CEILING)),
            top_p: options.top_p,
            stop_sequences: options.stop.as_deref(),
        }
    }
}

#[derive(Deserialize)]
struct MessagesReply {
    model: String,
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<MessagesUsage>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Default)]
struct MessagesUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

pub struct AnthropicClient {
    transport: HttpTransport,
    model: String,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(model: String, api_key: String) -> Result<Self, ApiError> {
        Ok(Self {
            transport: HttpTransport::new()?,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl ModelProviderClient for AnthropicClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError> {
        let body = MessagesRequest::new(&self.model, &messages, &options);
        let headers = [
            ("x-api-key", self.api_key.clone()),
            ("anthropic-version", API_VERSION.to_string()),
        ];
        let reply: MessagesReply = self.transport.post_json(MESSAGES_URL, &headers, &body).await?;

        let text: String = reply.content.iter().map(|block| block.text.as_str()).collect();
        let usage = reply.usage.unwrap_or_default();

        Ok(CompletionResponse {
            content: text,
            model: reply.model,
            usage: TokenUsage {
                prompt_tokens: usage.input_tokens,
                completion_tokens: usage.output_tokens,
                total_tokens: usage.input_tokens + usage.output_tokens,
            },
            finish_reason: reply.stop_reason,
        })
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
