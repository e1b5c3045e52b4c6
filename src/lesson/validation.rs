//! Section validators.
//!
//! Validators are pure: they read the content and the shared context and
//! return itemized issues. Error-severity issues block acceptance, warnings
//! only lower the score.

use crate::lesson::content::SectionContent;
use crate::lesson::context::SharedContext;
use crate::lesson::rules::WordBand;
use serde::{Deserialize, Serialize};
use std::fmt;

mod comprehension;
mod dialogue;
mod discussion;
mod grammar;
mod pronunciation;
mod reading;
mod vocabulary;
mod warmup;
mod wrapup;

const ERROR_PENALTY: u32 = 25;
const WARNING_PENALTY: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// What kind of rule an issue violates; drives the correction wording on retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Wrong number of items.
    Count,
    /// A required field is missing or blank.
    Missing,
    /// Text is outside the expected length band.
    Length,
    /// Language does not suit the learner level.
    Level,
    /// A banned phrasing pattern was found.
    Pattern,
    /// Content does not connect to the lesson context.
    Relevance,
    /// Repeated items.
    Duplicate,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IssueKind::Count => "count",
            IssueKind::Missing => "missing",
            IssueKind::Length => "length",
            IssueKind::Level => "level",
            IssueKind::Pattern => "pattern",
            IssueKind::Relevance => "relevance",
            IssueKind::Duplicate => "duplicate",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    /// The part of the content the issue is about, e.g. "questions".
    pub field: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl ValidationIssue {
    pub fn error(kind: IssueKind, field: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, field, description)
    }

    pub fn warning(
        kind: IssueKind,
        field: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, kind, field, description)
    }

    fn new(
        severity: Severity,
        kind: IssueKind,
        field: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            field: field.into(),
            description: description.into(),
            expected: None,
            actual: None,
        }
    }

    pub fn expected(mut self, expected: impl ToString) -> Self {
        self.expected = Some(expected.to_string());
        self
    }

    pub fn actual(mut self, actual: impl ToString) -> Self {
        self.actual = Some(actual.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub score: u32,
}

impl ValidationResult {
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let errors = issues.iter().filter(|issue| issue.is_error()).count() as u32;
        let warnings = issues.len() as u32 - errors;
        let penalty = errors * ERROR_PENALTY + warnings * WARNING_PENALTY;
        Self {
            is_valid: errors == 0,
            issues,
            score: 100u32.saturating_sub(penalty),
        }
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|issue| issue.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }
}

/// Validate one section against the shared context.
pub fn validate_section(content: &SectionContent, context: &SharedContext) -> ValidationResult {
    let issues = match content {
        SectionContent::Warmup(c) => warmup::validate(c, context),
        SectionContent::Vocabulary(c) => vocabulary::validate(c, context),
        SectionContent::Reading(c) => reading::validate(c, context),
        SectionContent::Comprehension(c) => comprehension::validate(c, context),
        SectionContent::DialoguePractice(c) => dialogue::validate_practice(c, context),
        SectionContent::DialogueFillGap(c) => dialogue::validate_fill_gap(c, context),
        SectionContent::Discussion(c) => discussion::validate(c, context),
        SectionContent::Grammar(c) => grammar::validate(c, context),
        SectionContent::Pronunciation(c) => pronunciation::validate(c, context),
        SectionContent::Wrapup(c) => wrapup::validate(c, context),
    };
    ValidationResult::from_issues(issues)
}

// Helpers shared by the per-kind validators.

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Error when `actual` falls outside `min..=max`.
fn check_count(
    issues: &mut Vec<ValidationIssue>,
    field: &str,
    actual: usize,
    min: usize,
    max: Option<usize>,
) {
    let (out_of_range, expected) = match max {
        Some(max) if min == max => (actual != min, format!("exactly {}", min)),
        Some(max) => (actual < min || actual > max, format!("{}-{}", min, max)),
        None => (actual < min, format!("at least {}", min)),
    };
    if out_of_range {
        issues.push(
            ValidationIssue::error(
                IssueKind::Count,
                field,
                format!("Expected {} {}, found {}", expected, field, actual),
            )
            .expected(expected)
            .actual(actual),
        );
    }
}

/// One warning for the share of sentences outside the level band, if any.
fn check_sentence_band<'a>(
    issues: &mut Vec<ValidationIssue>,
    field: &str,
    sentences: impl Iterator<Item = &'a str>,
    band: WordBand,
) {
    let outliers: Vec<usize> = sentences
        .filter(|s| !is_blank(s))
        .map(word_count)
        .filter(|count| !band.contains(*count))
        .collect();
    if let Some(first) = outliers.first() {
        issues.push(
            ValidationIssue::warning(
                IssueKind::Length,
                field,
                format!(
                    "{} {} fall outside the level band of {}",
                    outliers.len(),
                    field,
                    band
                ),
            )
            .expected(band)
            .actual(format!("{} words", first)),
        );
    }
}

/// Warning when the same item appears more than once (case-insensitive).
fn check_duplicates<'a>(
    issues: &mut Vec<ValidationIssue>,
    field: &str,
    items: impl Iterator<Item = &'a str>,
) {
    let mut seen: Vec<String> = Vec::new();
    let mut repeated = Vec::new();
    for item in items {
        let folded = item.trim().to_lowercase();
        if folded.is_empty() {
            continue;
        }
        if seen.contains(&folded) {
            repeated.push(item.trim().to_string());
        } else {
            seen.push(folded);
        }
    }
    if !repeated.is_empty() {
        issues.push(ValidationIssue::warning(
            IssueKind::Duplicate,
            field,
            format!("Repeated {}: {}", field, repeated.join(", ")),
        ));
    }
}

/// True when any context term (vocabulary or theme word) occurs in `text`.
fn mentions_context(text: &str, context: &SharedContext) -> bool {
    let haystack = text.to_lowercase();
    context
        .key_vocabulary
        .iter()
        .chain(context.main_themes.iter())
        .flat_map(|term| term.split_whitespace())
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|word| word.chars().count() >= 3)
        .any(|word| haystack.contains(&word))
}
