//! Dialogue practice and fill-gap dialogue share line, speaker and level checks.

use super::{check_count, is_blank, mentions_context, word_count, IssueKind, ValidationIssue};
use crate::lesson::content::{DialogueContent, FillGapContent};
use crate::lesson::context::SharedContext;
use crate::lesson::rules::{sentence_band, DIALOGUE_MIN_LINES, FILL_GAP_MIN_GAPS};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static MODAL_PERFECT: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:would|could|should|might|must)(?:n't|\s+not)?\s+have\s+([a-z]+)|\b(?:would|could|should|might|must)(?:n't)?'ve\b",
    )
    .ok()
});

const IRREGULAR_PARTICIPLES: &[&str] = &[
    "been", "done", "gone", "seen", "made", "had", "got", "said", "told", "known", "taken", "left",
    "lost", "won", "met", "paid", "bought", "brought", "thought", "caught", "put", "let", "hit",
    "run", "come", "become", "begun", "sung", "swum", "drunk", "eaten", "flown", "felt", "kept",
    "heard", "found", "sent", "spent", "built", "read", "held", "stood", "understood",
];

fn looks_like_participle(word: &str) -> bool {
    let word = word.to_lowercase();
    IRREGULAR_PARTICIPLES.contains(&word.as_str())
        || (word.len() > 3 && (word.ends_with("ed") || word.ends_with("en")))
}

/// First modal-perfect construction in `text`, if any.
pub(crate) fn find_modal_perfect(text: &str) -> Option<String> {
    let re = MODAL_PERFECT.as_ref()?;
    re.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        match caps.get(1) {
            Some(next) if !looks_like_participle(next.as_str()) => None,
            _ => Some(whole.as_str().to_string()),
        }
    })
}

struct LineView<'a> {
    speaker: &'a str,
    text: &'a str,
}

fn validate_lines(lines: &[LineView<'_>], context: &SharedContext) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    check_count(&mut issues, "lines", lines.len(), DIALOGUE_MIN_LINES, None);

    let incomplete = lines
        .iter()
        .filter(|line| is_blank(line.speaker) || is_blank(line.text))
        .count();
    if incomplete > 0 {
        issues.push(ValidationIssue::error(
            IssueKind::Missing,
            "lines",
            format!("{} lines lack a speaker or text", incomplete),
        ));
    }

    let speakers: HashSet<String> = lines
        .iter()
        .map(|line| line.speaker.trim().to_lowercase())
        .filter(|speaker| !speaker.is_empty())
        .collect();
    if !lines.is_empty() && speakers.len() < 2 {
        issues.push(
            ValidationIssue::error(
                IssueKind::Missing,
                "speakers",
                "A dialogue needs at least two speakers",
            )
            .expected("at least 2")
            .actual(speakers.len()),
        );
    }

    let level = context.difficulty_level;
    if level.is_beginner() {
        for line in lines {
            if let Some(found) = find_modal_perfect(line.text) {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::Level,
                        "lines",
                        format!(
                            "Modal perfect construction is too complex for {}: \"{}\"",
                            level, line.text
                        ),
                    )
                    .actual(found),
                );
            }
        }
    }

    let spoken: Vec<&str> = lines
        .iter()
        .map(|line| line.text)
        .filter(|text| !is_blank(text))
        .collect();
    if !spoken.is_empty() {
        let band = sentence_band(level);
        let average = spoken.iter().map(|text| word_count(text)).sum::<usize>() / spoken.len();
        if average > band.max {
            issues.push(
                ValidationIssue::warning(
                    IssueKind::Level,
                    "lines",
                    "Lines are long for this level",
                )
                .expected(band)
                .actual(format!("{} words on average", average)),
            );
        } else if level.is_advanced() && average < band.min {
            issues.push(
                ValidationIssue::warning(
                    IssueKind::Level,
                    "lines",
                    "Lines are too simple for this level",
                )
                .expected(band)
                .actual(format!("{} words on average", average)),
            );
        }

        if !mentions_context(&spoken.join(" "), context) {
            issues.push(ValidationIssue::warning(
                IssueKind::Relevance,
                "lines",
                "Dialogue does not use the lesson vocabulary",
            ));
        }
    }

    issues
}

pub(super) fn validate_practice(
    content: &DialogueContent,
    context: &SharedContext,
) -> Vec<ValidationIssue> {
    let lines: Vec<LineView<'_>> = content
        .lines
        .iter()
        .map(|line| LineView {
            speaker: &line.speaker,
            text: &line.text,
        })
        .collect();
    let mut issues = validate_lines(&lines, context);
    if is_blank(&content.setting) {
        issues.push(ValidationIssue::warning(
            IssueKind::Missing,
            "setting",
            "Dialogue has no setting",
        ));
    }
    issues
}

pub(super) fn validate_fill_gap(
    content: &FillGapContent,
    context: &SharedContext,
) -> Vec<ValidationIssue> {
    let lines: Vec<LineView<'_>> = content
        .lines
        .iter()
        .map(|line| LineView {
            speaker: &line.speaker,
            text: &line.text,
        })
        .collect();
    let mut issues = validate_lines(&lines, context);

    let gapped: Vec<_> = content.lines.iter().filter(|line| line.has_gap()).collect();
    check_count(&mut issues, "gapped lines", gapped.len(), FILL_GAP_MIN_GAPS, None);

    let unanswered = gapped
        .iter()
        .filter(|line| line.answer.as_deref().map_or(true, is_blank))
        .count();
    if unanswered > 0 {
        issues.push(ValidationIssue::error(
            IssueKind::Missing,
            "answers",
            format!("{} gapped lines have no answer", unanswered),
        ));
    }

    if is_blank(&content.instructions) {
        issues.push(ValidationIssue::warning(
            IssueKind::Missing,
            "instructions",
            "Fill-gap exercise has no instructions",
        ));
    }
    if content.word_bank.iter().all(|word| is_blank(word)) {
        issues.push(ValidationIssue::warning(
            IssueKind::Missing,
            "wordBank",
            "Fill-gap exercise has no word bank",
        ));
    }

    issues
}
