use super::{check_count, is_blank, IssueKind, ValidationIssue};
use crate::lesson::content::GrammarContent;
use crate::lesson::context::SharedContext;
use crate::lesson::rules::GRAMMAR_MIN_EXERCISES;

pub(super) fn validate(content: &GrammarContent, _context: &SharedContext) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if is_blank(&content.point) {
        issues.push(ValidationIssue::error(
            IssueKind::Missing,
            "point",
            "No grammar point named",
        ));
    }
    if is_blank(&content.explanation.form) {
        issues.push(ValidationIssue::error(
            IssueKind::Missing,
            "explanation.form",
            "Explanation does not describe the form",
        ));
    }
    if is_blank(&content.explanation.usage) {
        issues.push(ValidationIssue::error(
            IssueKind::Missing,
            "explanation.usage",
            "Explanation does not describe the usage",
        ));
    }

    check_count(
        &mut issues,
        "exercises",
        content.exercises.len(),
        GRAMMAR_MIN_EXERCISES,
        None,
    );
    let incomplete = content
        .exercises
        .iter()
        .filter(|exercise| is_blank(&exercise.prompt) || is_blank(&exercise.answer))
        .count();
    if incomplete > 0 {
        issues.push(
            ValidationIssue::error(
                IssueKind::Missing,
                "exercises",
                format!("{} exercises lack a prompt or an answer", incomplete),
            )
            .expected("prompt and answer for every exercise")
            .actual(format!("{} incomplete", incomplete)),
        );
    }

    if content.examples.iter().all(|example| is_blank(example)) {
        issues.push(ValidationIssue::warning(
            IssueKind::Missing,
            "examples",
            "No example sentences for the grammar point",
        ));
    }

    issues
}
