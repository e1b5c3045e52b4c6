//! Event schema for quality telemetry.
//!
//! A finished `QualityReport` decomposes into one `section_resolved` event per
//! section followed by a single `lesson_completed` event.

use crate::lesson::quality::{QualityReport, QualitySectionReport};
use crate::lesson::SectionKind;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityEvent {
    pub ts: String,
    pub correlation_id: String,
    pub seq: u64,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: Value,
}

impl QualityEvent {
    fn with_now(correlation_id: &str, seq: u64, event_type: &str, data: Value) -> Self {
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            correlation_id: correlation_id.to_string(),
            seq,
            event_type: event_type.to_string(),
            data,
        }
    }

    pub fn from_report(report: &QualityReport) -> Vec<QualityEvent> {
        let mut events: Vec<QualityEvent> = report
            .sections
            .iter()
            .enumerate()
            .map(|(seq, section)| {
                QualityEvent::with_now(
                    &report.correlation_id,
                    seq as u64,
                    "section_resolved",
                    to_value(&SectionResolvedData::from(section)),
                )
            })
            .collect();
        events.push(QualityEvent::with_now(
            &report.correlation_id,
            report.sections.len() as u64,
            "lesson_completed",
            to_value(&LessonCompletedData::from(report)),
        ));
        events
    }
}

fn to_value<T: Serialize>(data: &T) -> Value {
    serde_json::to_value(data).unwrap_or(Value::Null)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionResolvedData {
    pub section: SectionKind,
    pub attempts: u8,
    pub score: u32,
    pub accepted_valid: bool,
    pub placeholder: bool,
    pub tokens_used: u32,
    pub duration_ms: u64,
}

impl From<&QualitySectionReport> for SectionResolvedData {
    fn from(section: &QualitySectionReport) -> Self {
        Self {
            section: section.section,
            attempts: section.attempt_count,
            score: section.validation_score,
            accepted_valid: section.accepted_valid,
            placeholder: section.placeholder,
            tokens_used: section.tokens_used,
            duration_ms: section.generation_time_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonCompletedData {
    pub sections: usize,
    pub total_attempts: u32,
    pub total_regenerations: u32,
    pub total_tokens: u64,
    pub placeholders: usize,
    pub average_score: u32,
    pub context_fallback: bool,
    pub duration_ms: u64,
}

impl From<&QualityReport> for LessonCompletedData {
    fn from(report: &QualityReport) -> Self {
        Self {
            sections: report.sections.len(),
            total_attempts: report.total_attempts,
            total_regenerations: report.total_regenerations,
            total_tokens: report.total_tokens,
            placeholders: report.placeholder_count(),
            average_score: report.average_score(),
            context_fallback: report.context_fallback,
            duration_ms: report.duration_ms,
        }
    }
}
