//! Provider profile: the configured provider the pipeline talks to.

use crate::error::ApiError;
use crate::provider::ModelProvider;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[serde(alias = "open_ai")]
    OpenAI,
    Anthropic,
    Ollama,
    #[serde(alias = "local_custom", alias = "localcustom")]
    Local,
}

pub fn provider_type_slug(provider_type: ProviderType) -> &'static str {
    match provider_type {
        ProviderType::OpenAI => "openai",
        ProviderType::Anthropic => "anthropic",
        ProviderType::Ollama => "ollama",
        ProviderType::Local => "local",
    }
}

fn api_key_env_var(provider_type: ProviderType) -> Option<&'static str> {
    match provider_type {
        ProviderType::OpenAI => Some("OPENAI_API_KEY"),
        ProviderType::Anthropic => Some("ANTHROPIC_API_KEY"),
        ProviderType::Ollama | ProviderType::Local => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default = "default_provider_type")]
    pub provider_type: ProviderType,
    #[serde(default = "default_model")]
    pub model: String,
    /// Explicit key; falls back to the provider's conventional env var.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_provider_type() -> ProviderType {
    ProviderType::OpenAI
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_name: None,
            provider_type: default_provider_type(),
            model: default_model(),
            api_key: None,
            endpoint: None,
        }
    }
}

impl ProviderConfig {
    /// Structural checks that do not need network access.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model cannot be empty".to_string());
        }
        if self.provider_type == ProviderType::Local && self.endpoint.is_none() {
            return Err("Local providers require an endpoint".to_string());
        }
        if let Some(endpoint) = &self.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(format!(
                    "Endpoint must start with http:// or https://: {}",
                    endpoint
                ));
            }
        }
        Ok(())
    }

    /// Resolve the API key from config first, then from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                api_key_env_var(self.provider_type)
                    .and_then(|var| std::env::var(var).ok())
                    .filter(|key| !key.trim().is_empty())
            })
    }

    pub fn to_model_provider(&self) -> Result<ModelProvider, ApiError> {
        self.validate().map_err(ApiError::ConfigError)?;
        let name = self
            .provider_name
            .clone()
            .unwrap_or_else(|| provider_type_slug(self.provider_type).to_string());

        let require_key = || {
            self.resolve_api_key().ok_or_else(|| {
                ApiError::ProviderNotConfigured(format!(
                    "Provider '{}' has no API key (set it in config or {})",
                    name,
                    api_key_env_var(self.provider_type).unwrap_or("the config file")
                ))
            })
        };

        Ok(match self.provider_type {
            ProviderType::OpenAI => ModelProvider::OpenAI {
                model: self.model.clone(),
                api_key: require_key()?,
                base_url: self.endpoint.clone(),
            },
            ProviderType::Anthropic => ModelProvider::Anthropic {
                model: self.model.clone(),
                api_key: require_key()?,
            },
            ProviderType::Ollama => ModelProvider::Ollama {
                model: self.model.clone(),
                base_url: self.endpoint.clone(),
            },
            ProviderType::Local => ModelProvider::LocalCustom {
                model: self.model.clone(),
                endpoint: self.endpoint.clone().unwrap_or_default(),
                api_key: self.resolve_api_key(),
            },
        })
    }
}
