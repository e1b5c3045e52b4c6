//! Section validators exercised through the public parse + validate path.

use crate::integration::test_utils::{golf_context, valid_section};
use lessonloom::lesson::generators::parse_section;
use lessonloom::lesson::{validate_section, IssueKind, SectionContent};
use lessonloom::{ApiError, ProficiencyLevel, SectionKind};
use serde_json::json;

fn check(kind: SectionKind, value: serde_json::Value) -> lessonloom::lesson::ValidationResult {
    let content = parse_section(kind, &value.to_string()).unwrap();
    validate_section(&content, &golf_context())
}

#[test]
fn test_fixture_sections_validate_without_errors() {
    for kind in SectionKind::ALL {
        let result = check(kind, valid_section(kind));
        assert!(result.is_valid, "{}: {:?}", kind, result.issues);
        assert!(result.score >= 90, "{}: {:?}", kind, result.issues);
    }
}

#[test]
fn test_validation_is_deterministic() {
    let context = golf_context();
    for kind in SectionKind::ALL {
        let content = parse_section(kind, &valid_section(kind).to_string()).unwrap();
        assert_eq!(
            validate_section(&content, &context),
            validate_section(&content, &context)
        );
    }
}

#[test]
fn test_discussion_requires_exactly_five_questions() {
    let mut six = valid_section(SectionKind::Discussion);
    six["questions"]
        .as_array_mut()
        .unwrap()
        .push(json!("Which sport would you like to try next year?"));
    let result = check(SectionKind::Discussion, six);
    assert!(!result.is_valid);
    let count = result
        .errors()
        .find(|issue| issue.kind == IssueKind::Count)
        .unwrap();
    assert_eq!(count.expected.as_deref(), Some("exactly 5"));
    assert_eq!(count.actual.as_deref(), Some("6"));
}

#[test]
fn test_vocabulary_example_count_follows_level() {
    let content =
        parse_section(SectionKind::Vocabulary, &valid_section(SectionKind::Vocabulary).to_string())
            .unwrap();

    let mut context = golf_context();
    context.difficulty_level = ProficiencyLevel::C1;
    let result = validate_section(&content, &context);
    assert!(!result.is_valid);
    assert_eq!(
        result
            .errors()
            .filter(|issue| issue.kind == IssueKind::Count)
            .count(),
        5
    );

    context.difficulty_level = ProficiencyLevel::B1;
    assert!(validate_section(&content, &context).is_valid);
}

#[test]
fn test_beginner_dialogue_rejects_modal_perfect() {
    let mut dialogue = valid_section(SectionKind::DialoguePractice);
    dialogue["lines"][3]["text"] = json!("You should have seen the last putt on the course.");
    let content = parse_section(SectionKind::DialoguePractice, &dialogue.to_string()).unwrap();

    let mut context = golf_context();
    context.difficulty_level = ProficiencyLevel::A2;
    let result = validate_section(&content, &context);
    let level = result
        .errors()
        .find(|issue| issue.kind == IssueKind::Level)
        .unwrap();
    assert_eq!(level.actual.as_deref(), Some("should have seen"));

    context.difficulty_level = ProficiencyLevel::B2;
    assert!(validate_section(&content, &context)
        .errors()
        .all(|issue| issue.kind != IssueKind::Level));
}

#[test]
fn test_fill_gap_needs_answers_for_every_gap() {
    let mut gaps = valid_section(SectionKind::DialogueFillGap);
    gaps["lines"][0]["answer"] = json!(null);
    let result = check(SectionKind::DialogueFillGap, gaps);
    assert!(result
        .errors()
        .any(|issue| issue.field == "answers" && issue.kind == IssueKind::Missing));
}

#[test]
fn test_warmup_rejects_source_names() {
    let result = check(
        SectionKind::Warmup,
        json!({
            "questions": [
                "Do you think Scheffler deserved to win?",
                "What sports do you like to watch on television?",
                "Do you prefer playing sport outside or inside?"
            ]
        }),
    );
    assert!(!result.is_valid);
    assert_eq!(result.error_count(), 1);
    assert_eq!(result.score, 75);
}

#[test]
fn test_reading_length_is_a_warning() {
    let result = check(
        SectionKind::Reading,
        json!({
            "title": "Golf",
            "passage": "The golf course was quiet and green on the last morning of the tournament."
        }),
    );
    assert!(result.is_valid);
    assert!(result
        .issues
        .iter()
        .any(|issue| issue.kind == IssueKind::Length && !issue.is_error()));
}

#[test]
fn test_envelope_and_object_items_are_accepted() {
    let raw = json!({
        "warmup": {
            "questions": [
                { "question": "Have you ever played golf or mini golf with friends?" },
                { "question": "What sports do you like to watch on television?" },
                { "question": "Do you prefer playing sport outside or inside?" }
            ]
        }
    })
    .to_string();
    let content = parse_section(SectionKind::Warmup, &format!("```json\n{}\n```", raw)).unwrap();
    match &content {
        SectionContent::Warmup(warmup) => assert_eq!(warmup.questions.len(), 3),
        other => panic!("unexpected {:?}", other),
    }
    assert!(validate_section(&content, &golf_context()).is_valid);
}

#[test]
fn test_reply_without_json_is_malformed() {
    let err = parse_section(SectionKind::Grammar, "The past simple is easy!").unwrap_err();
    assert!(matches!(err, ApiError::MalformedOutput(_)));
}
