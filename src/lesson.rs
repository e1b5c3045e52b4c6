//! Lesson generation domain.
//!
//! A request flows through the context builder, then through every section in
//! `execution_order()`. Each section is generated, validated and, when needed,
//! regenerated a bounded number of times before the lesson is assembled.

pub mod content;
pub mod context;
pub mod generators;
pub mod orchestrator;
pub mod placeholder;
pub mod prompt;
pub mod quality;
pub mod regeneration;
pub mod rules;
pub mod sections;
pub mod types;
pub mod validation;

pub use content::{GeneratedSection, LessonSections, SectionContent};
pub use context::{ContextBuild, ContextBuilder, SharedContext};
pub use generators::{generator_for, SectionGenerator};
pub use orchestrator::{LessonArtifact, LessonOrchestrator};
pub use quality::{QualityReport, QualitySectionReport};
pub use regeneration::{AttemptState, InstructionVariant, RegenerationController, MAX_ATTEMPTS};
pub use sections::{execution_order, SectionKind, SectionSpec};
pub use types::{LessonKind, LessonRequest, ProficiencyLevel};
pub use validation::{validate_section, IssueKind, Severity, ValidationIssue, ValidationResult};
