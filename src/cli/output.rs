//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, LessonError, LessonErrorKind};
use thiserror::Error;

/// Any failure a command can end with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Lesson(#[from] LessonError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl CommandError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        CommandError::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit code: 2 for bad input, 3 for quota, 130 for Ctrl-C, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Lesson(e) => match e.kind {
                LessonErrorKind::InvalidRequest => 2,
                LessonErrorKind::QuotaExceeded => 3,
                LessonErrorKind::Cancelled => 130,
                _ => 1,
            },
            CommandError::Api(ApiError::InvalidRequest(_) | ApiError::MalformedOutput(_)) => 2,
            CommandError::Api(ApiError::ConfigError(_)) => 2,
            _ => 1,
        }
    }
}

/// Map command errors to the message printed on stderr.
pub fn map_error(e: &CommandError) -> String {
    match e {
        CommandError::Lesson(lesson) => match lesson.section {
            Some(section) => format!("{} [section: {}]", lesson.user_message(), section),
            None => lesson.user_message(),
        },
        other => other.to_string(),
    }
}
