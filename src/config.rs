//! Configuration System
//!
//! Layered configuration for the generation pipeline: built-in defaults, the
//! user's global file, the workspace file, then `LESSONLOOM__*` environment
//! variables. Tests included.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::provider::CompletionOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use crate::provider::{ProviderConfig, ProviderType};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LessonloomConfig {
    /// The provider every section is generated with
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Sampling and timeout settings
    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base sampling temperature; retries lower it.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion budget for each section call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Completion budget for the context extraction call.
    #[serde(default = "default_context_max_tokens")]
    pub context_max_tokens: u32,

    /// Per-call deadline; unset means wait for the provider's own timeout.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: Option<u64>,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_context_max_tokens() -> u32 {
    800
}

fn default_call_timeout_secs() -> Option<u64> {
    Some(120)
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            context_max_tokens: default_context_max_tokens(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than zero".to_string());
        }
        if self.context_max_tokens == 0 {
            return Err("context_max_tokens must be greater than zero".to_string());
        }
        if self.call_timeout_secs == Some(0) {
            return Err("call_timeout_secs must be greater than zero when set".to_string());
        }
        Ok(())
    }

    pub fn section_options(&self, temperature: f32) -> CompletionOptions {
        CompletionOptions::with_sampling(temperature, self.max_tokens)
    }

    /// Extraction wants stable output, so it samples cooler than sections.
    pub fn context_options(&self) -> CompletionOptions {
        CompletionOptions::with_sampling(self.temperature.min(0.3), self.context_max_tokens)
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_secs.map(Duration::from_secs)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Provider(String),
    Generation(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Provider(msg) => write!(f, "Provider: {}", msg),
            ValidationError::Generation(msg) => write!(f, "Generation: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl LessonloomConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.provider.validate() {
            errors.push(ValidationError::Provider(e));
        }
        if let Err(e) = self.generation.validate() {
            errors.push(ValidationError::Generation(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// `validate` folded into a single `ApiError` for command surfaces.
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })
    }

    /// Effective configuration rendered as TOML with secrets masked.
    pub fn to_redacted_toml(&self) -> Result<String, ApiError> {
        let mut shown = self.clone();
        if shown.provider.api_key.is_some() {
            shown.provider.api_key = Some("********".to_string());
        }
        toml::to_string_pretty(&shown)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}
