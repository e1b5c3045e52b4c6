//! Error types for the lesson generation pipeline.

use crate::lesson::SectionKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider, configuration and parsing errors.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider request timed out: {0}")]
    ProviderTimeout(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider quota exceeded: {0}")]
    ProviderQuotaExceeded(String),

    #[error("Provider rejected the request: {0}")]
    ProviderInvalidRequest(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("Malformed provider output: {0}")]
    MalformedOutput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Request-level failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonErrorKind {
    QuotaExceeded,
    ContentIssue,
    NetworkError,
    Unknown,
    InvalidRequest,
    Cancelled,
}

impl LessonErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonErrorKind::QuotaExceeded => "QUOTA_EXCEEDED",
            LessonErrorKind::ContentIssue => "CONTENT_ISSUE",
            LessonErrorKind::NetworkError => "NETWORK_ERROR",
            LessonErrorKind::Unknown => "UNKNOWN",
            LessonErrorKind::InvalidRequest => "INVALID_REQUEST",
            LessonErrorKind::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for LessonErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed failure returned for a whole lesson request.
///
/// No partial lesson accompanies this error; sections generated before the
/// failure are discarded.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{kind}: {message} (correlation id: {correlation_id})")]
pub struct LessonError {
    pub kind: LessonErrorKind,
    pub message: String,
    pub correlation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionKind>,
}

impl LessonError {
    pub fn new(
        kind: LessonErrorKind,
        message: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            correlation_id: correlation_id.into(),
            section: None,
        }
    }

    pub fn in_section(mut self, section: SectionKind) -> Self {
        self.section = Some(section);
        self
    }

    /// Human-readable guidance for the caller, keyed by failure class.
    pub fn user_message(&self) -> String {
        match self.kind {
            LessonErrorKind::QuotaExceeded => format!(
                "The generation provider's usage limit was reached. Wait before retrying or raise the provider quota. (ref {})",
                self.correlation_id
            ),
            LessonErrorKind::ContentIssue => format!(
                "The source text could not be turned into a lesson. Try a longer or cleaner excerpt. (ref {})",
                self.correlation_id
            ),
            LessonErrorKind::NetworkError => format!(
                "The generation provider could not be reached. Check connectivity and try again. (ref {})",
                self.correlation_id
            ),
            LessonErrorKind::InvalidRequest => {
                format!("Invalid lesson request: {} (ref {})", self.message, self.correlation_id)
            }
            LessonErrorKind::Cancelled => {
                format!("Lesson generation was cancelled. (ref {})", self.correlation_id)
            }
            LessonErrorKind::Unknown => format!(
                "Lesson generation failed unexpectedly. (ref {})",
                self.correlation_id
            ),
        }
    }
}
