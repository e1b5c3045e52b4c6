//! End-to-end lesson generation against a scripted provider.

use crate::integration::test_utils::{
    beginner_vocabulary, dialogue_with_modal_perfect, golf_request, happy_provider, marker,
    provider_with, provider_with_routes, valid_section, warmup_questions, CONTEXT_MARKER,
    GOLF_SOURCE,
};
use lessonloom::config::GenerationConfig;
use lessonloom::lesson::content::SectionContent;
use lessonloom::provider::{ChatMessage, ScriptedProvider, ScriptedReply};
use lessonloom::telemetry::CollectingMetricsSink;
use lessonloom::{
    ApiError, LessonErrorKind, LessonKind, LessonOrchestrator, LessonRequest, ProficiencyLevel,
    SectionKind,
};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn orchestrator(
    provider: Arc<ScriptedProvider>,
    sink: Arc<CollectingMetricsSink>,
) -> LessonOrchestrator {
    LessonOrchestrator::new(provider, sink, GenerationConfig::default())
}

const MODAL_PERFECTS: &[&str] = &[
    "would have",
    "could have",
    "should have",
    "might have",
    "must have",
];

fn has_modal_perfect(text: &str) -> bool {
    let lowered = text.to_lowercase();
    MODAL_PERFECTS.iter().any(|modal| lowered.contains(modal))
}

fn user_prompt(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn test_happy_path_accepts_every_section_first_time() {
    let provider = Arc::new(happy_provider());
    let sink = Arc::new(CollectingMetricsSink::new());

    let artifact = orchestrator(provider.clone(), sink.clone())
        .generate(&golf_request(), &CancellationToken::new())
        .await
        .unwrap();

    let report = &artifact.quality_report;
    assert_eq!(report.sections.len(), 10);
    for section in &report.sections {
        assert_eq!(section.attempt_count, 1, "{:?}", section);
        assert!(section.accepted_valid, "{:?}", section);
        assert!(!section.regenerated);
        assert!(!section.placeholder);
    }
    assert_eq!(report.total_attempts, 10);
    assert_eq!(report.total_regenerations, 0);
    assert!(!report.context_fallback);
    assert_eq!(report.context_tokens, 40);
    assert_eq!(report.total_tokens, 11 * 40);

    assert_eq!(artifact.sections.discussion.questions.len(), 5);
    assert_eq!(artifact.sections.warmup.questions, warmup_questions());
    assert_eq!(artifact.sections.grammar.point, "past simple");

    assert_eq!(provider.call_count(), 11);
    assert_eq!(provider.calls()[0].route.as_deref(), Some(CONTEXT_MARKER));

    assert_eq!(sink.len(), 1);
    assert_eq!(
        sink.last().unwrap().correlation_id,
        artifact.quality_report.correlation_id
    );
}

#[tokio::test]
async fn test_b1_discussion_has_five_questions_with_an_opinion() {
    let provider = Arc::new(happy_provider());
    let sink = Arc::new(CollectingMetricsSink::new());

    let artifact = orchestrator(provider, sink)
        .generate(&golf_request(), &CancellationToken::new())
        .await
        .unwrap();

    let questions = &artifact.sections.discussion.questions;
    assert_eq!(questions.len(), 5);
    let opinion_markers = ["what do you think", "is it better", "should", "prefer", "why"];
    assert!(
        questions.iter().any(|question| {
            let lowered = question.to_lowercase();
            opinion_markers.iter().any(|marker| lowered.contains(marker))
        }),
        "no opinion or comparison question in {:?}",
        questions
    );
    let discussion = artifact
        .quality_report
        .section(SectionKind::Discussion)
        .unwrap();
    assert!(discussion.accepted_valid);
}

#[tokio::test]
async fn test_a1_lesson_uses_five_examples_and_simple_dialogue() {
    let provider = Arc::new(provider_with_routes(vec![
        (
            SectionKind::Vocabulary,
            vec![ScriptedReply::json(beginner_vocabulary())],
        ),
        (
            SectionKind::DialoguePractice,
            vec![
                ScriptedReply::json(dialogue_with_modal_perfect()),
                ScriptedReply::json(valid_section(SectionKind::DialoguePractice)),
            ],
        ),
    ]));
    let sink = Arc::new(CollectingMetricsSink::new());
    let request =
        LessonRequest::new(GOLF_SOURCE, LessonKind::Discussion, ProficiencyLevel::A1, "English");

    let artifact = orchestrator(provider.clone(), sink.clone())
        .generate(&request, &CancellationToken::new())
        .await
        .unwrap();

    let vocabulary = &artifact.sections.vocabulary;
    assert_eq!(vocabulary.words.len(), 5);
    for entry in &vocabulary.words {
        assert_eq!(entry.examples.len(), 5, "{}", entry.word);
    }
    let vocabulary_report = artifact
        .quality_report
        .section(SectionKind::Vocabulary)
        .unwrap();
    assert_eq!(vocabulary_report.attempt_count, 1);
    assert!(vocabulary_report.accepted_valid);

    let dialogue_report = artifact
        .quality_report
        .section(SectionKind::DialoguePractice)
        .unwrap();
    assert_eq!(dialogue_report.attempt_count, 2);
    assert!(dialogue_report.regenerated);
    assert!(dialogue_report.accepted_valid);
    assert!(!dialogue_report.placeholder);
    for line in &artifact.sections.dialogue_practice.lines {
        assert!(!has_modal_perfect(&line.text), "{}", line.text);
    }
    for line in &artifact.sections.dialogue_fill_gap.lines {
        assert!(!has_modal_perfect(&line.text), "{}", line.text);
    }

    let dialogue_calls: Vec<_> = provider
        .calls()
        .into_iter()
        .filter(|call| {
            call.route.as_deref() == Some(marker(SectionKind::DialoguePractice).as_str())
        })
        .collect();
    assert_eq!(dialogue_calls.len(), 2);
    let retry = user_prompt(&dialogue_calls[1].messages);
    assert!(retry.contains("previous answer was rejected"));
    assert!(retry.contains("Match the learner level"));
    assert!(user_prompt(&dialogue_calls[0].messages).contains("A1"));

    assert_eq!(artifact.quality_report.sections.len(), 10);
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_sections_run_after_their_dependencies() {
    let provider = Arc::new(happy_provider());
    let sink = Arc::new(CollectingMetricsSink::new());

    orchestrator(provider.clone(), sink)
        .generate(&golf_request(), &CancellationToken::new())
        .await
        .unwrap();

    let order: Vec<String> = provider
        .calls()
        .into_iter()
        .filter_map(|call| call.route)
        .collect();
    let position = |kind: SectionKind| {
        order
            .iter()
            .position(|route| *route == marker(kind))
            .unwrap()
    };
    for kind in SectionKind::ALL {
        for dependency in kind.spec().dependencies {
            assert!(
                position(*dependency) < position(kind),
                "{} ran before {}",
                kind,
                dependency
            );
        }
    }
}

#[tokio::test]
async fn test_later_prompts_see_accepted_vocabulary() {
    let provider = Arc::new(happy_provider());
    let sink = Arc::new(CollectingMetricsSink::new());

    orchestrator(provider.clone(), sink)
        .generate(&golf_request(), &CancellationToken::new())
        .await
        .unwrap();

    let wrapup = provider
        .calls()
        .into_iter()
        .find(|call| call.route.as_deref() == Some(marker(SectionKind::Wrapup).as_str()))
        .unwrap();
    let prompt = user_prompt(&wrapup.messages);
    // "calm" only enters the context through the vocabulary section.
    assert!(prompt.contains("calm"));
    assert!(prompt.contains("past simple"));
}

#[tokio::test]
async fn test_discussion_with_four_questions_is_regenerated_once() {
    let short = json!({
        "questions": [
            "Do you watch any sport on television at the weekend?",
            "What do you think makes a sport exciting to watch?",
            "Is it better to play sport alone or in a team?",
            "Should famous players earn more money than teachers or nurses?"
        ]
    });
    let provider = Arc::new(provider_with(
        SectionKind::Discussion,
        vec![
            ScriptedReply::json(short),
            ScriptedReply::json(valid_section(SectionKind::Discussion)),
        ],
    ));
    let sink = Arc::new(CollectingMetricsSink::new());

    let artifact = orchestrator(provider.clone(), sink.clone())
        .generate(&golf_request(), &CancellationToken::new())
        .await
        .unwrap();

    let discussion = artifact
        .quality_report
        .section(SectionKind::Discussion)
        .unwrap();
    assert_eq!(discussion.attempt_count, 2);
    assert!(discussion.regenerated);
    assert!(discussion.accepted_valid);
    assert_eq!(artifact.sections.discussion.questions.len(), 5);
    assert_eq!(artifact.quality_report.total_regenerations, 1);

    let calls: Vec<_> = provider
        .calls()
        .into_iter()
        .filter(|call| call.route.as_deref() == Some(marker(SectionKind::Discussion).as_str()))
        .collect();
    assert_eq!(calls.len(), 2);
    let retry = user_prompt(&calls[1].messages);
    assert!(retry.contains("attempt 2 of 3"));
    assert!(retry.contains("Generate exactly 5 questions, not 4."));
    assert!(!user_prompt(&calls[0].messages).contains("previous answer was rejected"));

    let first = calls[0].options.temperature.unwrap();
    let second = calls[1].options.temperature.unwrap();
    assert!(second < first);
}

#[tokio::test]
async fn test_warmup_keeps_best_attempt_after_three_failures() {
    let attempt = |questions: &[&str]| ScriptedReply::json(json!({ "questions": questions }));
    let provider = Arc::new(provider_with(
        SectionKind::Warmup,
        vec![
            attempt(&[
                "Have you ever watched Scheffler play golf on TV?",
                "Would you like to play golf at Augusta one day?",
                "Do you prefer playing sport outside or inside?",
            ]),
            attempt(&[
                "Have you ever watched Scheffler play golf on TV?",
                "What sports do you like to watch on television?",
                "Do you prefer playing sport outside or inside?",
            ]),
            attempt(&[
                "Would you like to play golf at Augusta one day?",
                "Would you like to watch the Masters with friends?",
                "Do you prefer playing sport outside or inside?",
            ]),
        ],
    ));
    let sink = Arc::new(CollectingMetricsSink::new());

    let artifact = orchestrator(provider.clone(), sink.clone())
        .generate(&golf_request(), &CancellationToken::new())
        .await
        .unwrap();

    let warmup = artifact
        .quality_report
        .section(SectionKind::Warmup)
        .unwrap();
    assert_eq!(warmup.attempt_count, 3);
    assert!(!warmup.accepted_valid);
    assert!(!warmup.placeholder);
    assert_eq!(warmup.validation_score, 75);
    assert_eq!(warmup.issue_count, 1);
    assert_eq!(
        artifact.sections.warmup.questions[1],
        "What sports do you like to watch on television?"
    );
    assert_eq!(provider.calls_for(&marker(SectionKind::Warmup)), 3);

    // A section that never validates does not stop the lesson.
    assert_eq!(artifact.quality_report.sections.len(), 10);
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_quota_mid_lesson_aborts_without_partial_lesson() {
    let provider = Arc::new(provider_with(
        SectionKind::Grammar,
        vec![ScriptedReply::Error(ApiError::ProviderQuotaExceeded(
            "insufficient_quota".to_string(),
        ))],
    ));
    let sink = Arc::new(CollectingMetricsSink::new());

    let err = orchestrator(provider.clone(), sink.clone())
        .generate(&golf_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, LessonErrorKind::QuotaExceeded);
    assert_eq!(err.section, Some(SectionKind::Grammar));
    assert!(err.user_message().contains("usage limit"));
    assert_eq!(provider.calls_for(&marker(SectionKind::Grammar)), 1);
    assert_eq!(provider.calls_for(&marker(SectionKind::Pronunciation)), 0);
    assert_eq!(provider.calls_for(&marker(SectionKind::Wrapup)), 0);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_malformed_reply_is_retried() {
    let provider = Arc::new(provider_with(
        SectionKind::Comprehension,
        vec![
            ScriptedReply::text("Sure! Here are some questions about the text."),
            ScriptedReply::json(valid_section(SectionKind::Comprehension)),
        ],
    ));
    let sink = Arc::new(CollectingMetricsSink::new());

    let artifact = orchestrator(provider.clone(), sink)
        .generate(&golf_request(), &CancellationToken::new())
        .await
        .unwrap();

    let comprehension = artifact
        .quality_report
        .section(SectionKind::Comprehension)
        .unwrap();
    assert_eq!(comprehension.attempt_count, 2);
    assert!(comprehension.accepted_valid);

    let calls: Vec<_> = provider
        .calls()
        .into_iter()
        .filter(|call| {
            call.route.as_deref() == Some(marker(SectionKind::Comprehension).as_str())
        })
        .collect();
    assert!(user_prompt(&calls[1].messages).contains("exactly one JSON object"));
}

#[tokio::test]
async fn test_empty_replies_fall_back_to_placeholder() {
    let provider = Arc::new(provider_with(
        SectionKind::Pronunciation,
        vec![ScriptedReply::json(json!({ "words": [], "tongueTwisters": [] }))],
    ));
    let sink = Arc::new(CollectingMetricsSink::new());

    let artifact = orchestrator(provider.clone(), sink)
        .generate(&golf_request(), &CancellationToken::new())
        .await
        .unwrap();

    let pronunciation = artifact
        .quality_report
        .section(SectionKind::Pronunciation)
        .unwrap();
    assert!(pronunciation.placeholder);
    assert_eq!(pronunciation.attempt_count, 3);
    assert_eq!(artifact.quality_report.placeholder_count(), 1);
    assert!(!SectionContent::Pronunciation(artifact.sections.pronunciation.clone()).is_empty());
}

#[tokio::test]
async fn test_unusable_context_reply_falls_back_to_naive_extraction() {
    let provider = SectionKind::ALL.into_iter().fold(
        ScriptedProvider::new().route(
            CONTEXT_MARKER,
            vec![ScriptedReply::text("I could not read that text, sorry.")],
        ),
        |provider, kind| provider.route(marker(kind), vec![ScriptedReply::json(valid_section(kind))]),
    );
    let provider = Arc::new(provider);
    let sink = Arc::new(CollectingMetricsSink::new());

    let artifact = orchestrator(provider.clone(), sink)
        .generate(&golf_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(artifact.quality_report.context_fallback);
    assert_eq!(artifact.quality_report.sections.len(), 10);
    assert_eq!(provider.calls_for(CONTEXT_MARKER), 1);
}

#[tokio::test]
async fn test_context_network_error_is_not_fatal() {
    let provider = SectionKind::ALL.into_iter().fold(
        ScriptedProvider::new().route(
            CONTEXT_MARKER,
            vec![ScriptedReply::Error(ApiError::ProviderRequestFailed(
                "connection refused".to_string(),
            ))],
        ),
        |provider, kind| provider.route(marker(kind), vec![ScriptedReply::json(valid_section(kind))]),
    );
    let sink = Arc::new(CollectingMetricsSink::new());

    let artifact = orchestrator(Arc::new(provider), sink)
        .generate(&golf_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(artifact.quality_report.context_fallback);
    assert_eq!(artifact.quality_report.context_tokens, 0);
}

#[tokio::test]
async fn test_artifact_serializes_with_camel_case_keys() {
    let provider = Arc::new(happy_provider());
    let sink = Arc::new(CollectingMetricsSink::new());

    let artifact = orchestrator(provider, sink)
        .generate(&golf_request(), &CancellationToken::new())
        .await
        .unwrap();

    let value = serde_json::to_value(&artifact).unwrap();
    assert!(value["sections"]["dialogueFillGap"]["lines"].is_array());
    assert_eq!(value["qualityReport"]["totalAttempts"], 10);
    assert!(value["qualityReport"]["correlationId"]
        .as_str()
        .unwrap()
        .starts_with("req-"));
    assert!(value.get("context").is_none());
}
