use super::{check_count, is_blank, IssueKind, ValidationIssue};
use crate::lesson::content::WrapupContent;
use crate::lesson::context::SharedContext;
use crate::lesson::rules::WRAPUP_MIN_PROMPTS;

pub(super) fn validate(content: &WrapupContent, _context: &SharedContext) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if is_blank(&content.summary) {
        issues.push(ValidationIssue::error(
            IssueKind::Missing,
            "summary",
            "Wrap-up has no summary",
        ));
    }

    let prompts: Vec<&str> = content
        .reflection_prompts
        .iter()
        .map(String::as_str)
        .filter(|p| !is_blank(p))
        .collect();
    check_count(
        &mut issues,
        "reflection prompts",
        prompts.len(),
        WRAPUP_MIN_PROMPTS,
        None,
    );

    let personal = prompts.iter().any(|p| {
        p.to_lowercase()
            .split(|c: char| !c.is_alphabetic())
            .any(|word| word == "you" || word == "your")
    });
    if !prompts.is_empty() && !personal {
        issues.push(ValidationIssue::warning(
            IssueKind::Relevance,
            "reflection prompts",
            "Reflection prompts do not address the learner",
        ));
    }

    issues
}
