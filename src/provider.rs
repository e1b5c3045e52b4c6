//! Text-generation providers.
//!
//! The lesson pipeline only sees [`ModelProviderClient`]. Remote backends live in
//! submodules: [`chat_completions`] for OpenAI-style servers (OpenAI, Ollama,
//! self-hosted gateways) and [`anthropic`] for the Messages API. Tests drive the
//! pipeline through [`ScriptedProvider`] instead.

use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod anthropic;
pub mod chat_completions;
pub mod classify;
mod http;
pub mod profile;
pub mod scripted;

pub use anthropic::AnthropicClient;
pub use chat_completions::ChatCompletionsClient;
pub use classify::{classify_error, ProviderErrorClass};
pub use profile::{provider_type_slug, ProviderConfig, ProviderType};
pub use scripted::{ScriptedProvider, ScriptedReply};

/// A fully resolved backend: model plus whatever credentials and address it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ModelProvider {
    OpenAI {
        model: String,
        api_key: String,
        /// Overrides the public API root, e.g. for Azure deployments.
        base_url: Option<String>,
    },
    Anthropic {
        model: String,
        api_key: String,
    },
    Ollama {
        model: String,
        base_url: Option<String>,
    },
    LocalCustom {
        model: String,
        /// API root that `/chat/completions` is appended to.
        endpoint: String,
        api_key: Option<String>,
    },
}

impl ModelProvider {
    pub fn model(&self) -> &str {
        match self {
            ModelProvider::OpenAI { model, .. }
            | ModelProvider::Anthropic { model, .. }
            | ModelProvider::Ollama { model, .. }
            | ModelProvider::LocalCustom { model, .. } => model,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    fn with_role(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::Assistant, content)
    }
}

/// Sampling knobs for one call. `None` leaves the backend default in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub stop: Option<Vec<String>>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self::with_temperature(1.0)
    }
}

impl CompletionOptions {
    fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            max_tokens: None,
            top_p: None,
            stop: None,
        }
    }

    pub fn with_sampling(temperature: f32, max_tokens: u32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            ..Self::with_temperature(temperature)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
    pub finish_reason: Option<String>,
}

#[async_trait]
pub trait ModelProviderClient: Send + Sync {
    /// Send one conversation and return the model's single reply.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError>;

    fn provider_name(&self) -> &str;

    fn model_name(&self) -> &str;
}

pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_client(
        provider: &ModelProvider,
    ) -> Result<Box<dyn ModelProviderClient>, ApiError> {
        let client: Box<dyn ModelProviderClient> = match provider.clone() {
            ModelProvider::OpenAI {
                model,
                api_key,
                base_url,
            } => Box::new(ChatCompletionsClient::openai(model, api_key, base_url)?),
            ModelProvider::Anthropic { model, api_key } => {
                Box::new(AnthropicClient::new(model, api_key)?)
            }
            ModelProvider::Ollama { model, base_url } => {
                Box::new(ChatCompletionsClient::ollama(model, base_url)?)
            }
            ModelProvider::LocalCustom {
                model,
                endpoint,
                api_key,
            } => Box::new(ChatCompletionsClient::local(model, endpoint, api_key)?),
        };
        tracing::debug!(
            provider = client.provider_name(),
            model = client.model_name(),
            "provider client ready"
        );
        Ok(client)
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Box<dyn ModelProviderClient>, ApiError> {
        Self::create_client(&config.to_model_provider()?)
    }
}
