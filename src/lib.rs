//! lessonloom: progressive, quality-gated lesson generation.
//!
//! A source text and a learner level go in; a ten-section language lesson and
//! a quality report come out. Every section is generated by an LLM provider,
//! checked by a pure validator, and regenerated a bounded number of times when
//! it falls short.

pub mod cli;
pub mod config;
pub mod error;
pub mod lesson;
pub mod logging;
pub mod provider;
pub mod telemetry;

pub use error::{ApiError, LessonError, LessonErrorKind};
pub use lesson::{
    LessonArtifact, LessonKind, LessonOrchestrator, LessonRequest, ProficiencyLevel, SectionKind,
};
