//! Shared context derivation through the provider seam.

use crate::integration::test_utils::{context_reply, golf_request, CONTEXT_MARKER, GOLF_SOURCE};
use lessonloom::lesson::context::{MAX_KEY_VOCABULARY, SUMMARY_MAX_CHARS};
use lessonloom::lesson::ContextBuilder;
use lessonloom::provider::{CompletionOptions, ScriptedProvider, ScriptedReply};
use lessonloom::{ApiError, LessonKind, LessonRequest, ProficiencyLevel};
use serde_json::json;

fn options() -> CompletionOptions {
    CompletionOptions::with_sampling(0.3, 800)
}

#[tokio::test]
async fn test_provider_reply_becomes_the_context() {
    let provider =
        ScriptedProvider::new().route(CONTEXT_MARKER, vec![ScriptedReply::json(context_reply())]);

    let built = ContextBuilder::new(&provider, options())
        .build(&golf_request())
        .await
        .unwrap();

    assert!(!built.used_fallback);
    assert_eq!(built.tokens_used, 40);
    assert_eq!(built.context.key_vocabulary[0], "tournament");
    assert_eq!(built.context.main_themes, vec!["golf", "competition"]);
    assert_eq!(built.context.difficulty_level, ProficiencyLevel::B1);
    assert_eq!(built.context.source_text, GOLF_SOURCE);
    assert!(!built.context.minimal);

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].options.temperature, Some(0.3));
    assert!(calls[0].messages[1].content.contains("Scottie Scheffler"));
}

#[tokio::test]
async fn test_partial_reply_is_filled_from_naive_extraction() {
    let provider = ScriptedProvider::new().route(
        CONTEXT_MARKER,
        vec![ScriptedReply::json(json!({
            "key_vocabulary": ["green jacket", "final round"],
            "main_themes": [],
            "content_summary": ""
        }))],
    );

    let built = ContextBuilder::new(&provider, options())
        .build(&golf_request())
        .await
        .unwrap();

    assert!(built.used_fallback);
    assert_eq!(built.context.key_vocabulary, vec!["green jacket", "final round"]);
    assert!(!built.context.main_themes.is_empty());
    assert!(built.context.content_summary.starts_with("The Masters tournament"));
}

#[tokio::test]
async fn test_reply_lists_are_deduplicated_and_capped() {
    let words: Vec<String> = (0..30).map(|i| format!("word{}", i % 20)).collect();
    let provider = ScriptedProvider::new().route(
        CONTEXT_MARKER,
        vec![ScriptedReply::json(json!({
            "key_vocabulary": words,
            "main_themes": ["golf", "Golf", "sport"],
            "content_summary": "x ".repeat(SUMMARY_MAX_CHARS)
        }))],
    );

    let built = ContextBuilder::new(&provider, options())
        .build(&golf_request())
        .await
        .unwrap();

    assert_eq!(built.context.key_vocabulary.len(), MAX_KEY_VOCABULARY);
    assert_eq!(built.context.main_themes, vec!["golf", "sport"]);
    assert!(built.context.content_summary.chars().count() <= SUMMARY_MAX_CHARS);
}

#[tokio::test]
async fn test_short_source_skips_the_provider() {
    let provider = ScriptedProvider::new();
    let request = LessonRequest::new(
        "Golf is a quiet sport.",
        LessonKind::Discussion,
        ProficiencyLevel::A1,
        "English",
    );

    let built = ContextBuilder::new(&provider, options())
        .build(&request)
        .await
        .unwrap();

    assert!(built.context.minimal);
    assert!(built.used_fallback);
    assert_eq!(built.tokens_used, 0);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_empty_source_yields_minimal_context() {
    let provider = ScriptedProvider::new();

    for source in ["", "   \n\t "] {
        let request =
            LessonRequest::new(source, LessonKind::Travel, ProficiencyLevel::B2, "English");
        let built = ContextBuilder::new(&provider, options())
            .build(&request)
            .await
            .unwrap();

        assert!(built.context.minimal);
        assert!(built.used_fallback);
        assert!(!built.context.key_vocabulary.is_empty());
        assert!(!built.context.main_themes.is_empty());
        assert!(!built.context.content_summary.is_empty());
        assert_eq!(built.context.difficulty_level, ProficiencyLevel::B2);
    }
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_quota_error_escapes_the_builder() {
    let provider = ScriptedProvider::new().route(
        CONTEXT_MARKER,
        vec![ScriptedReply::Error(ApiError::ProviderQuotaExceeded(
            "billing hard limit reached".to_string(),
        ))],
    );

    let err = ContextBuilder::new(&provider, options())
        .build(&golf_request())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ProviderQuotaExceeded(_)));
}

#[tokio::test]
async fn test_other_errors_degrade_to_naive_context() {
    let provider = ScriptedProvider::new().route(
        CONTEXT_MARKER,
        vec![ScriptedReply::Error(ApiError::ProviderAuthFailed(
            "invalid api key".to_string(),
        ))],
    );

    let built = ContextBuilder::new(&provider, options())
        .build(&golf_request())
        .await
        .unwrap();

    assert!(built.used_fallback);
    assert!(built.context.key_vocabulary.contains(&"tournament".to_string()));
}
