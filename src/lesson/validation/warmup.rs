//! Warm-up questions must be answerable before the learner reads the source.

use super::{check_count, check_sentence_band, is_blank, IssueKind, ValidationIssue};
use crate::lesson::content::WarmupContent;
use crate::lesson::context::SharedContext;
use crate::lesson::rules::{sentence_band, WARMUP_MAX_QUESTIONS, WARMUP_MIN_QUESTIONS};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static RETROSPECTIVE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bwhat happened\b",
        r"(?i)\baccording to the (?:text|article|passage|story|report)\b",
        r"(?i)\bin the (?:text|article|passage|story|report)\b",
        r"(?i)\bwho won\b",
        r"(?i:\bwhat did\s+)(?:the\s+)?[A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*\s+(?i:do|say|think|decide|achieve|win)\b",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

static ADDRESSES_LEARNER: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)\byour?\b").ok());

pub(super) fn validate(content: &WarmupContent, context: &SharedContext) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let questions: Vec<&str> = content
        .questions
        .iter()
        .map(String::as_str)
        .filter(|q| !is_blank(q))
        .collect();

    check_count(
        &mut issues,
        "questions",
        questions.len(),
        WARMUP_MIN_QUESTIONS,
        Some(WARMUP_MAX_QUESTIONS),
    );
    if questions.len() < content.questions.len() {
        issues.push(ValidationIssue::error(
            IssueKind::Missing,
            "questions",
            "Blank warm-up question",
        ));
    }

    check_sentence_band(
        &mut issues,
        "questions",
        questions.iter().copied(),
        sentence_band(context.difficulty_level),
    );

    let source_names = source_proper_nouns(&context.source_text);
    for question in &questions {
        if let Some(pattern) = RETROSPECTIVE.iter().find(|re| re.is_match(question)) {
            issues.push(
                ValidationIssue::error(
                    IssueKind::Pattern,
                    "questions",
                    format!("Question refers back to the source: \"{}\"", question),
                )
                .actual(pattern.find(question).map(|m| m.as_str()).unwrap_or_default()),
            );
            continue;
        }
        let named: Vec<&str> = non_initial_capitalized(question)
            .into_iter()
            .filter(|token| source_names.contains(*token))
            .collect();
        if !named.is_empty() {
            issues.push(
                ValidationIssue::error(
                    IssueKind::Pattern,
                    "questions",
                    format!(
                        "Question names people or events from the source: \"{}\"",
                        question
                    ),
                )
                .actual(named.join(", ")),
            );
        }
    }

    let addresses_learner = match ADDRESSES_LEARNER.as_ref() {
        Some(re) => questions.iter().any(|q| re.is_match(q)),
        None => true,
    };
    if !questions.is_empty() && !addresses_learner {
        issues.push(ValidationIssue::warning(
            IssueKind::Relevance,
            "questions",
            "No question asks about the learner's own experience (you/your)",
        ));
    }

    issues
}

fn clean_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

fn is_capitalized(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase) && token != "I"
}

/// Capitalized tokens that are not the first word of the text.
fn non_initial_capitalized(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .skip(1)
        .map(clean_token)
        .filter(|token| is_capitalized(token))
        .collect()
}

/// Capitalized tokens of the source that do not start a sentence.
fn source_proper_nouns(source: &str) -> HashSet<&str> {
    let mut names = HashSet::new();
    let mut sentence_start = true;
    for raw in source.split_whitespace() {
        let token = clean_token(raw);
        if !sentence_start && is_capitalized(token) {
            names.insert(token);
        }
        sentence_start = raw.ends_with(|c: char| matches!(c, '.' | '!' | '?'));
    }
    names
}
