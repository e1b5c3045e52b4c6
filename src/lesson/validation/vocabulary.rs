use super::{
    check_count, check_duplicates, check_sentence_band, is_blank, mentions_context, IssueKind,
    ValidationIssue,
};
use crate::lesson::content::VocabularyContent;
use crate::lesson::context::SharedContext;
use crate::lesson::rules::{
    sentence_band, vocabulary_examples_per_word, VOCABULARY_MAX_WORDS, VOCABULARY_MIN_WORDS,
};

pub(super) fn validate(
    content: &VocabularyContent,
    context: &SharedContext,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let required_examples = vocabulary_examples_per_word(context.difficulty_level);

    check_count(
        &mut issues,
        "words",
        content.words.len(),
        VOCABULARY_MIN_WORDS,
        Some(VOCABULARY_MAX_WORDS),
    );

    for (index, entry) in content.words.iter().enumerate() {
        let label = if is_blank(&entry.word) {
            issues.push(ValidationIssue::error(
                IssueKind::Missing,
                "word",
                format!("Vocabulary entry {} has no word", index + 1),
            ));
            format!("entry {}", index + 1)
        } else {
            format!("'{}'", entry.word.trim())
        };

        if is_blank(&entry.definition) {
            issues.push(ValidationIssue::error(
                IssueKind::Missing,
                "definition",
                format!("Missing definition for {}", label),
            ));
        }
        if is_blank(&entry.part_of_speech) {
            issues.push(ValidationIssue::warning(
                IssueKind::Missing,
                "partOfSpeech",
                format!("Missing part of speech for {}", label),
            ));
        }

        let examples = entry.examples.iter().filter(|e| !is_blank(e)).count();
        if examples != required_examples || examples < entry.examples.len() {
            let field = format!("examples for {}", label);
            issues.push(
                ValidationIssue::error(
                    IssueKind::Count,
                    field.clone(),
                    format!(
                        "Expected exactly {} {}, found {}",
                        required_examples, field, examples
                    ),
                )
                .expected(format!("exactly {}", required_examples))
                .actual(examples),
            );
        }

        let stem = stem_of(&entry.word);
        if !stem.is_empty()
            && entry
                .examples
                .iter()
                .any(|example| !example.to_lowercase().contains(&stem))
        {
            issues.push(ValidationIssue::warning(
                IssueKind::Relevance,
                "examples",
                format!("Some examples for {} do not use the word", label),
            ));
        }
    }

    check_duplicates(
        &mut issues,
        "words",
        content.words.iter().map(|entry| entry.word.as_str()),
    );
    check_sentence_band(
        &mut issues,
        "examples",
        content
            .words
            .iter()
            .flat_map(|entry| entry.examples.iter().map(String::as_str)),
        sentence_band(context.difficulty_level),
    );

    let all_examples = content
        .words
        .iter()
        .flat_map(|entry| entry.examples.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    if !all_examples.is_empty() && !mentions_context(&all_examples, context) {
        issues.push(ValidationIssue::warning(
            IssueKind::Relevance,
            "examples",
            "Examples never touch the source topic",
        ));
    }

    issues
}

/// Leading part of the headword used to spot inflected uses in examples.
fn stem_of(word: &str) -> String {
    let first = word.split_whitespace().next().unwrap_or_default().to_lowercase();
    let chars: Vec<char> = first.chars().collect();
    if chars.len() <= 4 {
        first
    } else {
        chars[..chars.len() - 2].iter().collect()
    }
}
