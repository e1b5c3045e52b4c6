use super::{is_blank, mentions_context, word_count, IssueKind, ValidationIssue};
use crate::lesson::content::ReadingContent;
use crate::lesson::context::SharedContext;
use crate::lesson::rules::reading_band;

pub(super) fn validate(content: &ReadingContent, context: &SharedContext) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if is_blank(&content.passage) {
        issues.push(ValidationIssue::error(
            IssueKind::Missing,
            "passage",
            "Reading passage is empty",
        ));
        return issues;
    }
    if is_blank(&content.title) {
        issues.push(ValidationIssue::warning(
            IssueKind::Missing,
            "title",
            "Reading passage has no title",
        ));
    }

    let band = reading_band(context.difficulty_level);
    let words = word_count(&content.passage);
    if !band.contains(words) {
        issues.push(
            ValidationIssue::warning(
                IssueKind::Length,
                "passage",
                format!("Passage has {} words, outside the level band", words),
            )
            .expected(band)
            .actual(format!("{} words", words)),
        );
    }

    if !mentions_context(&content.passage, context) {
        issues.push(ValidationIssue::warning(
            IssueKind::Relevance,
            "passage",
            "Passage does not use the lesson's key vocabulary or themes",
        ));
    }

    issues
}
