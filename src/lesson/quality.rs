//! Per-section and per-request quality reporting.

use crate::lesson::regeneration::SectionResolution;
use crate::lesson::sections::SectionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySectionReport {
    pub section: SectionKind,
    pub attempt_count: u8,
    pub validation_score: u32,
    pub generation_time_ms: u64,
    pub issue_count: usize,
    pub warning_count: usize,
    pub regenerated: bool,
    pub accepted_valid: bool,
    pub placeholder: bool,
    pub tokens_used: u32,
}

impl QualitySectionReport {
    pub fn from_resolution(resolution: &SectionResolution) -> Self {
        Self {
            section: resolution.section.section,
            attempt_count: resolution.attempt_count,
            validation_score: resolution.validation.score,
            generation_time_ms: resolution.generation_time_ms,
            issue_count: resolution.validation.error_count(),
            warning_count: resolution.validation.warning_count(),
            regenerated: resolution.attempt_count > 1,
            accepted_valid: resolution.accepted_valid,
            placeholder: resolution.placeholder,
            tokens_used: resolution.tokens_used,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub correlation_id: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<QualitySectionReport>,
    pub total_attempts: u32,
    pub total_regenerations: u32,
    pub total_tokens: u64,
    pub context_tokens: u32,
    pub context_fallback: bool,
    pub duration_ms: u64,
}

impl QualityReport {
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            generated_at: Utc::now(),
            sections: Vec::new(),
            total_attempts: 0,
            total_regenerations: 0,
            total_tokens: 0,
            context_tokens: 0,
            context_fallback: false,
            duration_ms: 0,
        }
    }

    pub fn record_context(&mut self, tokens: u32, fallback: bool) {
        self.context_tokens = tokens;
        self.context_fallback = fallback;
        self.total_tokens += u64::from(tokens);
    }

    pub fn push(&mut self, section: QualitySectionReport) {
        self.total_attempts += u32::from(section.attempt_count);
        self.total_regenerations += u32::from(section.attempt_count.saturating_sub(1));
        self.total_tokens += u64::from(section.tokens_used);
        self.sections.push(section);
    }

    pub fn finalize(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn section(&self, kind: SectionKind) -> Option<&QualitySectionReport> {
        self.sections.iter().find(|report| report.section == kind)
    }

    pub fn placeholder_count(&self) -> usize {
        self.sections.iter().filter(|report| report.placeholder).count()
    }

    /// Mean validation score across sections, 0 when there are none.
    pub fn average_score(&self) -> u32 {
        if self.sections.is_empty() {
            return 0;
        }
        let total: u32 = self.sections.iter().map(|r| r.validation_score).sum();
        total / self.sections.len() as u32
    }
}
