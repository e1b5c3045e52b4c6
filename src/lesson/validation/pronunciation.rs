use super::{check_count, is_blank, mentions_context, IssueKind, ValidationIssue};
use crate::lesson::content::PronunciationContent;
use crate::lesson::context::SharedContext;
use crate::lesson::rules::{PRONUNCIATION_MIN_TWISTERS, PRONUNCIATION_MIN_WORDS};

pub(super) fn validate(
    content: &PronunciationContent,
    context: &SharedContext,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    check_count(
        &mut issues,
        "words",
        content.words.len(),
        PRONUNCIATION_MIN_WORDS,
        None,
    );
    for (index, word) in content.words.iter().enumerate() {
        let label = if is_blank(&word.word) {
            format!("entry {}", index + 1)
        } else {
            format!("'{}'", word.word.trim())
        };
        if is_blank(&word.word) || is_blank(&word.phonetic) {
            issues.push(ValidationIssue::error(
                IssueKind::Missing,
                "phonetic",
                format!("Pronunciation {} needs both the word and its transcription", label),
            ));
        }
        if word.tips.iter().all(|tip| is_blank(tip)) {
            issues.push(ValidationIssue::error(
                IssueKind::Missing,
                "tips",
                format!("Pronunciation {} has no tip", label),
            ));
        }
    }

    let twisters: Vec<&String> = content
        .tongue_twisters
        .iter()
        .filter(|twister| !is_blank(twister))
        .collect();
    check_count(
        &mut issues,
        "tongue twisters",
        twisters.len(),
        PRONUNCIATION_MIN_TWISTERS,
        None,
    );
    if !twisters.is_empty() && !twisters.iter().any(|t| mentions_context(t, context)) {
        issues.push(ValidationIssue::warning(
            IssueKind::Relevance,
            "tongue twisters",
            "Tongue twisters are unrelated to the lesson theme",
        ));
    }

    issues
}
