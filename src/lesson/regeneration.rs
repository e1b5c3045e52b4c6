//! Bounded regeneration of a single section.
//!
//! `Pending -> Attempted(n) -> Accepted | Exhausted`, with n never above
//! `MAX_ATTEMPTS`. The controller only tracks attempts and decides what the
//! next instruction variant is; the orchestrator performs the calls.

use crate::error::{ApiError, LessonErrorKind};
use crate::lesson::content::GeneratedSection;
use crate::lesson::context::SharedContext;
use crate::lesson::placeholder::placeholder_for;
use crate::lesson::sections::SectionKind;
use crate::lesson::validation::{validate_section, IssueKind, Severity, ValidationIssue, ValidationResult};
use crate::provider::{classify_error, ProviderErrorClass};
use serde::Serialize;

/// Hard cap on provider calls per section.
pub const MAX_ATTEMPTS: u8 = 3;

const TEMPERATURE_STEP: f32 = 0.2;
const MIN_TEMPERATURE: f32 = 0.2;
const MAX_CORRECTIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "attempt")]
pub enum AttemptState {
    Pending,
    Attempted(u8),
    Accepted(u8),
    Exhausted,
}

/// Instructions for one attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionVariant {
    Initial,
    Adjusted { attempt: u8, corrections: Vec<String> },
}

impl InstructionVariant {
    pub fn attempt(&self) -> u8 {
        match self {
            InstructionVariant::Initial => 1,
            InstructionVariant::Adjusted { attempt, .. } => *attempt,
        }
    }

    pub fn corrections(&self) -> &[String] {
        match self {
            InstructionVariant::Initial => &[],
            InstructionVariant::Adjusted { corrections, .. } => corrections,
        }
    }

    /// Sampling temperature for this attempt; each retry is more conservative.
    pub fn temperature(&self, base: f32) -> f32 {
        let steps = f32::from(self.attempt().saturating_sub(1));
        (base - TEMPERATURE_STEP * steps).max(MIN_TEMPERATURE.min(base))
    }

    /// Text appended to the user prompt on retries.
    pub fn render(&self) -> Option<String> {
        match self {
            InstructionVariant::Initial => None,
            InstructionVariant::Adjusted { attempt, corrections } => {
                let mut block = format!(
                    "This is attempt {} of {}. The previous answer was rejected.",
                    attempt, MAX_ATTEMPTS
                );
                if !corrections.is_empty() {
                    block.push_str(" Fix the following:\n");
                    for correction in corrections {
                        block.push_str("- ");
                        block.push_str(correction);
                        block.push('\n');
                    }
                }
                Some(block)
            }
        }
    }
}

/// Correction sentence for one validation issue.
pub fn correction_for(issue: &ValidationIssue) -> String {
    match issue.kind {
        IssueKind::Count => match (&issue.expected, &issue.actual) {
            (Some(expected), Some(actual)) => {
                format!("Generate {} {}, not {}.", expected, issue.field, actual)
            }
            _ => format!("{}.", issue.description),
        },
        IssueKind::Missing => format!("Fill in every {}: {}.", issue.field, issue.description),
        IssueKind::Length => match &issue.expected {
            Some(band) => format!("Keep {} within {}.", issue.field, band),
            None => format!("Adjust the length of {}.", issue.field),
        },
        IssueKind::Level => format!(
            "Match the learner level: {}.",
            issue.description.trim_end_matches('.')
        ),
        IssueKind::Pattern => format!(
            "Rewrite without referring to the source text or naming its people or events. {}",
            issue.description
        ),
        IssueKind::Relevance => format!("{}; connect it to the lesson topic.", issue.description),
        IssueKind::Duplicate => format!("Avoid repetition. {}.", issue.description),
    }
}

/// Corrections for the next attempt: errors first, then warnings, de-duplicated.
pub fn derive_corrections(validation: &ValidationResult) -> Vec<String> {
    let mut corrections: Vec<String> = Vec::new();
    let ordered = validation
        .issues
        .iter()
        .filter(|issue| issue.severity == Severity::Error)
        .chain(
            validation
                .issues
                .iter()
                .filter(|issue| issue.severity == Severity::Warning),
        );
    for issue in ordered {
        let correction = correction_for(issue);
        if !corrections.contains(&correction) {
            corrections.push(correction);
        }
        if corrections.len() == MAX_CORRECTIONS {
            break;
        }
    }
    corrections
}

fn corrections_for_failure(class: ProviderErrorClass) -> Vec<String> {
    match class {
        ProviderErrorClass::ContentIssue => vec![
            "Return exactly one JSON object with the requested keys and nothing else.".to_string(),
        ],
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    Produced {
        section: GeneratedSection,
        validation: ValidationResult,
    },
    Failed {
        error: ApiError,
        class: ProviderErrorClass,
        tokens_used: u32,
    },
}

#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub attempt: u8,
    pub duration_ms: u64,
    pub outcome: AttemptOutcome,
}

impl AttemptRecord {
    fn tokens_used(&self) -> u32 {
        match &self.outcome {
            AttemptOutcome::Produced { section, .. } => section.tokens_used,
            AttemptOutcome::Failed { tokens_used, .. } => *tokens_used,
        }
    }

    /// Ranking key of a produced attempt: usable content first, then score.
    fn rank(&self) -> Option<(bool, u32)> {
        match &self.outcome {
            AttemptOutcome::Produced {
                section,
                validation,
            } => Some((!section.content.is_empty(), validation.score)),
            AttemptOutcome::Failed { .. } => None,
        }
    }
}

/// Index of the best produced attempt.
///
/// Attempts with content outrank empty ones whatever their score; within each
/// group the highest score wins, earliest on ties.
pub fn select_best(records: &[AttemptRecord]) -> Option<usize> {
    let mut best: Option<(usize, (bool, u32))> = None;
    for (index, record) in records.iter().enumerate() {
        let Some(rank) = record.rank() else {
            continue;
        };
        match best {
            Some((_, best_rank)) if rank <= best_rank => {}
            _ => best = Some((index, rank)),
        }
    }
    best.map(|(index, _)| index)
}

/// Final state of one section.
#[derive(Debug, Clone)]
pub struct SectionResolution {
    pub section: GeneratedSection,
    pub validation: ValidationResult,
    pub attempt_count: u8,
    pub accepted_valid: bool,
    pub placeholder: bool,
    pub tokens_used: u32,
    pub generation_time_ms: u64,
}

/// The section could not produce any content.
#[derive(Debug, Clone)]
pub struct SectionAbort {
    pub kind: LessonErrorKind,
    pub message: String,
    pub attempt_count: u8,
}

/// Per-section attempt bookkeeping.
#[derive(Debug)]
pub struct RegenerationController {
    kind: SectionKind,
    state: AttemptState,
    records: Vec<AttemptRecord>,
}

impl RegenerationController {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            state: AttemptState::Pending,
            records: Vec::new(),
        }
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn attempts(&self) -> &[AttemptRecord] {
        &self.records
    }

    /// Variant for the next attempt, or `None` once the section is settled.
    pub fn next_variant(&self) -> Option<InstructionVariant> {
        match self.state {
            AttemptState::Pending => Some(InstructionVariant::Initial),
            AttemptState::Attempted(n) if n < MAX_ATTEMPTS => {
                let corrections = match self.records.last().map(|r| &r.outcome) {
                    Some(AttemptOutcome::Produced { validation, .. }) => {
                        derive_corrections(validation)
                    }
                    Some(AttemptOutcome::Failed { class, .. }) => corrections_for_failure(*class),
                    None => Vec::new(),
                };
                Some(InstructionVariant::Adjusted {
                    attempt: n + 1,
                    corrections,
                })
            }
            _ => None,
        }
    }

    pub fn record_produced(
        &mut self,
        section: GeneratedSection,
        validation: ValidationResult,
        duration_ms: u64,
    ) -> AttemptState {
        let valid = validation.is_valid;
        self.push(
            AttemptOutcome::Produced {
                section,
                validation,
            },
            duration_ms,
            valid,
        )
    }

    /// Record a failed attempt. Quota failures must not reach this point.
    pub fn record_failure(
        &mut self,
        error: ApiError,
        tokens_used: u32,
        duration_ms: u64,
    ) -> AttemptState {
        let class = classify_error(&error);
        self.push(
            AttemptOutcome::Failed {
                error,
                class,
                tokens_used,
            },
            duration_ms,
            false,
        )
    }

    fn push(&mut self, outcome: AttemptOutcome, duration_ms: u64, accepted: bool) -> AttemptState {
        let attempt = self.records.len() as u8 + 1;
        self.records.push(AttemptRecord {
            attempt,
            duration_ms,
            outcome,
        });
        self.state = if accepted {
            AttemptState::Accepted(attempt)
        } else if attempt >= MAX_ATTEMPTS {
            AttemptState::Exhausted
        } else {
            AttemptState::Attempted(attempt)
        };
        self.state
    }

    /// Settle the section once no further attempt is due.
    pub fn finish(self, context: &SharedContext) -> Result<SectionResolution, SectionAbort> {
        let attempt_count = self.records.len() as u8;
        let tokens_used = self.records.iter().map(AttemptRecord::tokens_used).sum();
        let generation_time_ms = self.records.iter().map(|r| r.duration_ms).sum();

        let Some(best) = select_best(&self.records) else {
            let (kind, message) = match self.records.last().map(|r| &r.outcome) {
                Some(AttemptOutcome::Failed { error, class, .. }) => {
                    (class.lesson_error_kind(), error.to_string())
                }
                _ => (
                    LessonErrorKind::Unknown,
                    format!("No attempt was made for section {}", self.kind),
                ),
            };
            return Err(SectionAbort {
                kind,
                message,
                attempt_count,
            });
        };

        let mut records = self.records;
        let AttemptOutcome::Produced {
            section,
            validation,
        } = records.swap_remove(best).outcome
        else {
            return Err(SectionAbort {
                kind: LessonErrorKind::Unknown,
                message: format!("Best attempt for section {} has no content", self.kind),
                attempt_count,
            });
        };

        if section.content.is_empty() {
            let content = placeholder_for(self.kind, context);
            let validation = validate_section(&content, context);
            return Ok(SectionResolution {
                section: GeneratedSection {
                    section: self.kind,
                    content,
                    tokens_used: section.tokens_used,
                    generation_strategy: "placeholder".to_string(),
                },
                accepted_valid: validation.is_valid,
                validation,
                attempt_count,
                placeholder: true,
                tokens_used,
                generation_time_ms,
            });
        }

        Ok(SectionResolution {
            accepted_valid: validation.is_valid,
            section,
            validation,
            attempt_count,
            placeholder: false,
            tokens_used,
            generation_time_ms,
        })
    }
}
