use super::{check_count, check_duplicates, is_blank, IssueKind, ValidationIssue};
use crate::lesson::content::ComprehensionContent;
use crate::lesson::context::SharedContext;
use crate::lesson::rules::COMPREHENSION_MIN_QUESTIONS;

pub(super) fn validate(
    content: &ComprehensionContent,
    _context: &SharedContext,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    check_count(
        &mut issues,
        "questions",
        content.questions.len(),
        COMPREHENSION_MIN_QUESTIONS,
        None,
    );

    let incomplete: Vec<usize> = content
        .questions
        .iter()
        .enumerate()
        .filter(|(_, q)| is_blank(&q.question) || is_blank(&q.answer))
        .map(|(index, _)| index + 1)
        .collect();
    if !incomplete.is_empty() {
        issues.push(
            ValidationIssue::error(
                IssueKind::Missing,
                "question or answer",
                format!(
                    "Comprehension items without both question and answer: {:?}",
                    incomplete
                ),
            )
            .actual(format!("{} incomplete", incomplete.len())),
        );
    }

    check_duplicates(
        &mut issues,
        "questions",
        content.questions.iter().map(|q| q.question.as_str()),
    );

    issues
}
