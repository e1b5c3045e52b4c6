//! Classification of provider failures into retry classes.
//!
//! Typed variants decide first; free-form `ProviderError` messages fall back to
//! keyword matching because some gateways report quota or network trouble with
//! a 200 status and an error body.

use crate::error::{ApiError, LessonErrorKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderErrorClass {
    QuotaExceeded,
    ContentIssue,
    NetworkError,
    Unknown,
}

impl ProviderErrorClass {
    /// Quota failures abort the request; every other class spends one attempt.
    pub fn aborts_immediately(self) -> bool {
        matches!(self, ProviderErrorClass::QuotaExceeded)
    }

    pub fn lesson_error_kind(self) -> LessonErrorKind {
        match self {
            ProviderErrorClass::QuotaExceeded => LessonErrorKind::QuotaExceeded,
            ProviderErrorClass::ContentIssue => LessonErrorKind::ContentIssue,
            ProviderErrorClass::NetworkError => LessonErrorKind::NetworkError,
            ProviderErrorClass::Unknown => LessonErrorKind::Unknown,
        }
    }
}

const QUOTA_MARKERS: &[&str] = &[
    "quota",
    "rate limit",
    "rate_limit",
    "too many requests",
    "insufficient_quota",
    "billing",
];
const NETWORK_MARKERS: &[&str] = &[
    "timeout",
    "timed out",
    "connection",
    "network",
    "dns",
    "unreachable",
    "reset by peer",
];
const CONTENT_MARKERS: &[&str] = &[
    "content policy",
    "content_filter",
    "safety",
    "invalid input",
    "invalid_request",
    "malformed",
];

fn message_matches(message: &str, markers: &[&str]) -> bool {
    let lowered = message.to_lowercase();
    markers.iter().any(|marker| lowered.contains(marker))
}

pub fn classify_error(error: &ApiError) -> ProviderErrorClass {
    match error {
        ApiError::ProviderRateLimit(_) | ApiError::ProviderQuotaExceeded(_) => {
            ProviderErrorClass::QuotaExceeded
        }
        ApiError::ProviderTimeout(_) | ApiError::ProviderRequestFailed(_) => {
            ProviderErrorClass::NetworkError
        }
        ApiError::ProviderInvalidRequest(_) | ApiError::MalformedOutput(_) => {
            ProviderErrorClass::ContentIssue
        }
        ApiError::ProviderError(message) => classify_message(message),
        ApiError::ProviderAuthFailed(_)
        | ApiError::ProviderModelNotFound(_)
        | ApiError::ProviderNotConfigured(_)
        | ApiError::ConfigError(_)
        | ApiError::InvalidRequest(_) => ProviderErrorClass::Unknown,
    }
}

fn classify_message(message: &str) -> ProviderErrorClass {
    if message_matches(message, QUOTA_MARKERS) {
        ProviderErrorClass::QuotaExceeded
    } else if message_matches(message, NETWORK_MARKERS) {
        ProviderErrorClass::NetworkError
    } else if message_matches(message, CONTENT_MARKERS) {
        ProviderErrorClass::ContentIssue
    } else {
        ProviderErrorClass::Unknown
    }
}
