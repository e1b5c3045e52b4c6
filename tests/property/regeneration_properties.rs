//! Attempt bounds and best-attempt selection.

use lessonloom::lesson::content::{DiscussionContent, GeneratedSection, SectionContent};
use lessonloom::lesson::context::naive_context;
use lessonloom::lesson::regeneration::{
    select_best, AttemptOutcome, AttemptRecord, AttemptState, RegenerationController,
    MAX_ATTEMPTS,
};
use lessonloom::lesson::{IssueKind, ValidationIssue, ValidationResult};
use lessonloom::{LessonKind, LessonRequest, ProficiencyLevel, SectionKind};
use proptest::prelude::*;

fn section(tag: usize) -> GeneratedSection {
    GeneratedSection {
        section: SectionKind::Discussion,
        content: SectionContent::Discussion(DiscussionContent {
            questions: vec![format!("What do you think about golf, part {}?", tag)],
        }),
        tokens_used: 10,
        generation_strategy: "discussion".to_string(),
    }
}

fn result_with_errors(errors: usize) -> ValidationResult {
    ValidationResult::from_issues(
        (0..errors)
            .map(|_| ValidationIssue::error(IssueKind::Count, "questions", "wrong count"))
            .collect(),
    )
}

/// However validation goes, a section gets at most three attempts and stops at
/// the first valid one.
#[test]
fn test_attempts_never_exceed_limit() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(0usize..4, 3..8), |error_counts| {
            let context = naive_context(&LessonRequest::new(
                "Golf players walk the course during the tournament.",
                LessonKind::Discussion,
                ProficiencyLevel::B1,
                "English",
            ));
            let mut controller = RegenerationController::new(SectionKind::Discussion);
            let mut scripted = error_counts.iter();
            let mut made = 0u8;

            while let Some(variant) = controller.next_variant() {
                made += 1;
                prop_assert_eq!(variant.attempt(), made);
                let errors = scripted.next().copied().unwrap_or_default();
                controller.record_produced(section(made as usize), result_with_errors(errors), 1);
            }

            prop_assert!(made >= 1 && made <= MAX_ATTEMPTS);
            let first_valid = error_counts
                .iter()
                .take(MAX_ATTEMPTS as usize)
                .position(|errors| *errors == 0);
            match first_valid {
                Some(index) => {
                    prop_assert_eq!(controller.state(), AttemptState::Accepted(index as u8 + 1));
                }
                None => {
                    prop_assert_eq!(controller.state(), AttemptState::Exhausted);
                }
            }

            let resolution = controller.finish(&context).unwrap();
            prop_assert_eq!(resolution.attempt_count, made);
            prop_assert_eq!(resolution.accepted_valid, first_valid.is_some());
            Ok(())
        })
        .unwrap();
}

/// The chosen attempt has the highest score, and no earlier attempt ties it.
#[test]
fn test_best_attempt_is_highest_then_earliest() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(0usize..5, 1..=3), |error_counts| {
            let records: Vec<AttemptRecord> = error_counts
                .iter()
                .enumerate()
                .map(|(index, errors)| AttemptRecord {
                    attempt: index as u8 + 1,
                    duration_ms: 1,
                    outcome: AttemptOutcome::Produced {
                        section: section(index),
                        validation: result_with_errors(*errors),
                    },
                })
                .collect();

            let best = select_best(&records).unwrap();
            let fewest = *error_counts.iter().min().unwrap();
            prop_assert_eq!(error_counts[best], fewest);
            prop_assert!(error_counts[..best].iter().all(|errors| *errors > fewest));
            Ok(())
        })
        .unwrap();
}
