//! Discussion questions: exact count plus level-dependent escalation.

use super::{check_count, check_duplicates, check_sentence_band, is_blank, IssueKind, ValidationIssue};
use crate::lesson::content::DiscussionContent;
use crate::lesson::context::SharedContext;
use crate::lesson::rules::{sentence_band, DISCUSSION_QUESTION_COUNT};
use crate::lesson::types::ProficiencyLevel;
use once_cell::sync::Lazy;
use regex::Regex;

static OPINION: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:think|opinion|feel|prefer|better|worse|best|agree|compare|comparison|rather|should|why|more|less)\b",
    )
    .ok()
});

static ANALYTICAL: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:to what extent|how far|implications?|evaluate|consequences?|justify|why|how (?:might|could|would|does|do))\b",
    )
    .ok()
});

fn any_match(pattern: &Lazy<Option<Regex>>, questions: &[&str]) -> bool {
    match pattern.as_ref() {
        Some(re) => questions.iter().any(|q| re.is_match(q)),
        None => true,
    }
}

pub(super) fn validate(
    content: &DiscussionContent,
    context: &SharedContext,
) -> Vec<ValidationIssue> {
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
        content.questions.len(),
        DISCUSSION_QUESTION_COUNT,
        Some(DISCUSSION_QUESTION_COUNT),
    );
    if questions.len() < content.questions.len() {
        issues.push(ValidationIssue::error(
            IssueKind::Missing,
            "questions",
            "Blank discussion question",
        ));
    }
    check_duplicates(&mut issues, "questions", questions.iter().copied());
    check_sentence_band(
        &mut issues,
        "questions",
        questions.iter().copied(),
        sentence_band(context.difficulty_level),
    );

    if questions.is_empty() {
        return issues;
    }
    if context.difficulty_level >= ProficiencyLevel::B1 && !any_match(&OPINION, &questions) {
        issues.push(ValidationIssue::warning(
            IssueKind::Level,
            "questions",
            "No opinion or comparison question for this level",
        ));
    }
    if context.difficulty_level >= ProficiencyLevel::B2 && !any_match(&ANALYTICAL, &questions) {
        issues.push(ValidationIssue::warning(
            IssueKind::Level,
            "questions",
            "No analytical or evaluative question for this level",
        ));
    }

    issues
}
