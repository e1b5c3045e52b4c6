//! Client for servers speaking the `/chat/completions` dialect.
//!
//! OpenAI, Ollama (under `/v1`) and self-hosted gateways all accept the same
//! request body, so one client covers them and only the URL, bearer token and
//! reported provider name differ.

use super::http::HttpTransport;
use super::{
    ChatMessage, CompletionOptions, CompletionResponse, ModelProviderClient, TokenUsage,
};
use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub(crate) const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub(crate) const OLLAMA_BASE_URL: &str = "http://localhost:11434";

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
    stream: bool,
}

#[derive(Deserialize)]
struct WireReply {
    model: String,
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl From<WireUsage> for TokenUsage {
    fn from(usage: WireUsage) -> Self {
        TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage
                .total_tokens
                .max(usage.prompt_tokens + usage.completion_tokens),
        }
    }
}

pub struct ChatCompletionsClient {
    transport: HttpTransport,
    provider: &'static str,
    model: String,
    url: String,
    bearer: Option<String>,
}

impl ChatCompletionsClient {
    pub fn openai(model: String, api_key: String, base_url: Option<String>) -> Result<Self, ApiError> {
        let base = base_url.unwrap_or_else(|| OPENAI_BASE_URL.to_string());
        Self::build("openai", model, &base, Some(api_key))
    }

    pub fn ollama(model: String, base_url: Option<String>) -> Result<Self, ApiError> {
        let base = base_url.unwrap_or_else(|| OLLAMA_BASE_URL.to_string());
        let base = format!("{}/v1", base.trim_end_matches('/'));
        Self::build("ollama", model, &base, None)
    }

    pub fn local(model: String, endpoint: String, api_key: Option<String>) -> Result<Self, ApiError> {
        Self::build("local", model, &endpoint, api_key)
    }

    fn build(
        provider: &'static str,
        model: String,
        base: &str,
        bearer: Option<String>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            transport: HttpTransport::new()?,
            provider,
            model,
            url: format!("{}/chat/completions", base.trim_end_matches('/')),
            bearer,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ModelProviderClient for ChatCompletionsClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError> {
        let body = WireRequest {
            model: &self.model,
            messages: &messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: options.stop.as_deref(),
            stream: false,
        };
        let headers: Vec<(&'static str, String)> = self
            .bearer
            .iter()
            .map(|token| ("authorization", format!("Bearer {}", token)))
            .collect();

        let reply: WireReply = self.transport.post_json(&self.url, &headers, &body).await?;
        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::ProviderError("Reply carried no choices".to_string()))?;

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            model: reply.model,
            usage: reply.usage.unwrap_or_default().into(),
            finish_reason: choice.finish_reason,
        })
    }

    fn provider_name(&self) -> &str {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
