//! Validators are pure and their scores follow the penalty formula.

use lessonloom::lesson::content::{
    DiscussionContent, SectionContent, VocabularyContent, VocabularyEntry,
};
use lessonloom::lesson::context::naive_context;
use lessonloom::lesson::rules::vocabulary_examples_per_word;
use lessonloom::lesson::{validate_section, IssueKind, SharedContext};
use lessonloom::{LessonKind, LessonRequest, ProficiencyLevel};
use proptest::prelude::*;

fn context(level: ProficiencyLevel) -> SharedContext {
    naive_context(&LessonRequest::new(
        "Golf players walk the course and putt on fast greens during the tournament.",
        LessonKind::Discussion,
        level,
        "English",
    ))
}

fn level_strategy() -> impl Strategy<Value = ProficiencyLevel> {
    prop::sample::select(ProficiencyLevel::ALL.to_vec())
}

fn question_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}", 0..25).prop_map(|words| {
        if words.is_empty() {
            String::new()
        } else {
            format!("Do you {}?", words.join(" "))
        }
    })
}

/// Same input, same result, and the score matches the issue counts.
#[test]
fn test_discussion_validation_is_pure() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                prop::collection::vec(question_strategy(), 0..9),
                level_strategy(),
            ),
            |(questions, level)| {
                let context = context(level);
                let content = SectionContent::Discussion(DiscussionContent {
                    questions: questions.clone(),
                });

                let first = validate_section(&content, &context);
                let second = validate_section(&content, &context);
                prop_assert_eq!(&first, &second);

                let errors = first.error_count() as u32;
                let warnings = first.warning_count() as u32;
                prop_assert_eq!(first.score, 100u32.saturating_sub(errors * 25 + warnings * 5));
                prop_assert_eq!(first.is_valid, errors == 0);

                let count_error = first
                    .errors()
                    .any(|issue| issue.kind == IssueKind::Count);
                prop_assert_eq!(count_error, questions.len() != 5);
                Ok(())
            },
        )
        .unwrap();
}

/// Every entry whose example count differs from the level's requirement is an error.
#[test]
fn test_vocabulary_example_counts_follow_level() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(0usize..7, 5..=10), level_strategy()),
            |(example_counts, level)| {
                let words = example_counts
                    .iter()
                    .enumerate()
                    .map(|(index, count)| {
                        let word = format!("golfword{}", index);
                        VocabularyEntry {
                            word: word.clone(),
                            part_of_speech: "noun".to_string(),
                            definition: "a word about golf".to_string(),
                            examples: (0..*count)
                                .map(|n| format!("The {} is part of golf lesson number {}.", word, n))
                                .collect(),
                        }
                    })
                    .collect();
                let content = SectionContent::Vocabulary(VocabularyContent { words });
                let result = validate_section(&content, &context(level));

                let required = vocabulary_examples_per_word(level);
                let expected_errors = example_counts
                    .iter()
                    .filter(|count| **count != required)
                    .count();
                let example_errors = result
                    .errors()
                    .filter(|issue| issue.kind == IssueKind::Count)
                    .filter(|issue| issue.field.starts_with("examples for"))
                    .count();
                prop_assert_eq!(example_errors, expected_errors);
                Ok(())
            },
        )
        .unwrap();
}
