//! Shared lesson context and its builder.
//!
//! The context is derived once per request and then replaced, never mutated,
//! as accepted sections fold their results back in.

use crate::error::ApiError;
use crate::lesson::prompt::{self, PromptParts};
use crate::lesson::types::{LessonKind, LessonRequest, ProficiencyLevel};
use crate::provider::{classify_error, CompletionOptions, ModelProviderClient};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const MAX_KEY_VOCABULARY: usize = 15;
pub const MAX_THEMES: usize = 5;
pub const SUMMARY_MAX_CHARS: usize = 600;
/// Sources shorter than this skip the provider call entirely.
pub const MIN_WORDS_FOR_EXTRACTION: usize = 20;

const NAIVE_THEME_COUNT: usize = 3;
const NAIVE_MIN_WORD_LEN: usize = 4;
const SOURCE_PROMPT_CHARS: usize = 6000;

const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "also", "although", "among", "been", "before",
    "being", "below", "between", "both", "cannot", "could", "does", "doing", "down", "during",
    "each", "even", "every", "from", "further", "have", "having", "here", "hers", "herself",
    "himself", "into", "itself", "just", "many", "more", "most", "much", "must", "myself", "never",
    "once", "only", "other", "ought", "ours", "ourselves", "over", "same", "said", "says", "shall",
    "should", "since", "some", "such", "than", "that", "their", "theirs", "them", "themselves",
    "then", "there", "these", "they", "this", "those", "through", "under", "until", "upon", "very",
    "were", "what", "when", "where", "which", "while", "whom", "whose", "will", "with", "within",
    "without", "would", "your", "yours", "yourself", "yourselves", "like", "well", "still",
    "because", "around", "another", "across", "already", "almost", "always", "really", "made",
];

/// Request-scoped context read by every generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedContext {
    pub key_vocabulary: Vec<String>,
    pub main_themes: Vec<String>,
    pub content_summary: String,
    pub difficulty_level: ProficiencyLevel,
    pub source_text: String,
    pub lesson_kind: LessonKind,
    pub target_language: String,
    pub minimal: bool,
    pub grammar_focus: Option<String>,
}

impl SharedContext {
    /// Accepted vocabulary terms go to the front; the list stays de-duplicated and capped.
    pub fn with_vocabulary(&self, terms: &[String]) -> SharedContext {
        let merged = terms
            .iter()
            .chain(self.key_vocabulary.iter())
            .cloned()
            .collect::<Vec<_>>();
        SharedContext {
            key_vocabulary: dedupe_capped(merged, MAX_KEY_VOCABULARY),
            ..self.clone()
        }
    }

    pub fn with_grammar_focus(&self, point: &str) -> SharedContext {
        let point = point.trim();
        SharedContext {
            grammar_focus: if point.is_empty() {
                self.grammar_focus.clone()
            } else {
                Some(point.to_string())
            },
            ..self.clone()
        }
    }
}

/// Outcome of a context build.
#[derive(Debug, Clone)]
pub struct ContextBuild {
    pub context: SharedContext,
    pub tokens_used: u32,
    /// True when naive extraction produced the context.
    pub used_fallback: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExtractionReply {
    #[serde(alias = "keyVocabulary")]
    key_vocabulary: Vec<String>,
    #[serde(alias = "mainThemes")]
    main_themes: Vec<String>,
    #[serde(alias = "contentSummary")]
    content_summary: String,
}

/// Derives the `SharedContext` for a request with at most one provider call.
pub struct ContextBuilder<'a> {
    provider: &'a dyn ModelProviderClient,
    options: CompletionOptions,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(provider: &'a dyn ModelProviderClient, options: CompletionOptions) -> Self {
        Self { provider, options }
    }

    /// Build the context. Only quota failures escape; every other failure
    /// degrades to naive extraction. Empty or short sources never reach the
    /// provider and come back flagged `minimal`.
    pub async fn build(&self, request: &LessonRequest) -> Result<ContextBuild, ApiError> {
        if prompt::word_count(&request.source_text) < MIN_WORDS_FOR_EXTRACTION {
            debug!(
                words = prompt::word_count(&request.source_text),
                "Source below extraction threshold, using naive context"
            );
            let mut context = naive_context(request);
            context.minimal = true;
            return Ok(ContextBuild {
                context,
                tokens_used: 0,
                used_fallback: true,
            });
        }

        let messages = extraction_prompt(request).into_messages();
        let response = match self.provider.complete(messages, self.options.clone()).await {
            Ok(response) => response,
            Err(err) => {
                if classify_error(&err).aborts_immediately() {
                    return Err(err);
                }
                warn!(error = %err, "Context extraction failed, using naive context");
                return Ok(ContextBuild {
                    context: naive_context(request),
                    tokens_used: 0,
                    used_fallback: true,
                });
            }
        };

        let tokens_used = response.usage.total_tokens;
        let reply = prompt::extract_json(&response.content)
            .and_then(|value| serde_json::from_value::<ExtractionReply>(value).ok());
        let Some(reply) = reply else {
            warn!("Context extraction reply was not usable JSON, using naive context");
            return Ok(ContextBuild {
                context: naive_context(request),
                tokens_used,
                used_fallback: true,
            });
        };

        let (context, used_fallback) = merge_extraction(request, reply);
        Ok(ContextBuild {
            context,
            tokens_used,
            used_fallback,
        })
    }
}

fn extraction_prompt(request: &LessonRequest) -> PromptParts {
    let system = prompt::system_prompt(
        "context",
        "You analyse source texts for language teachers and extract what a lesson should build on.",
    );
    let user = format!(
        "Learner level: {level}\nTarget language: {language}\nLesson type: {kind}\n\n\
         Source text:\n\"\"\"\n{source}\n\"\"\"\n\n\
         Return JSON with exactly these keys:\n\
         - \"key_vocabulary\": up to {max_vocab} useful words or short phrases from the text, most important first\n\
         - \"main_themes\": 1 to {max_themes} short theme labels\n\
         - \"content_summary\": a neutral summary of at most {summary} characters",
        level = request.proficiency_level,
        language = request.target_language,
        kind = request.lesson_kind,
        source = prompt::truncate_chars(request.source_text.trim(), SOURCE_PROMPT_CHARS),
        max_vocab = MAX_KEY_VOCABULARY,
        max_themes = MAX_THEMES,
        summary = SUMMARY_MAX_CHARS,
    );
    PromptParts { system, user }
}

/// Combine a provider reply with naive extraction for whatever the reply left empty.
fn merge_extraction(request: &LessonRequest, reply: ExtractionReply) -> (SharedContext, bool) {
    let naive = naive_context(request);
    let mut used_fallback = false;

    let mut key_vocabulary = dedupe_capped(reply.key_vocabulary, MAX_KEY_VOCABULARY);
    if key_vocabulary.is_empty() {
        key_vocabulary = naive.key_vocabulary.clone();
        used_fallback = true;
    }

    let mut main_themes = dedupe_capped(reply.main_themes, MAX_THEMES);
    if main_themes.is_empty() {
        main_themes = naive.main_themes.clone();
        used_fallback = true;
    }

    let mut content_summary = bound_summary(&reply.content_summary);
    if content_summary.is_empty() {
        content_summary = naive.content_summary.clone();
        used_fallback = true;
    }

    (
        SharedContext {
            key_vocabulary,
            main_themes,
            content_summary,
            ..naive
        },
        used_fallback,
    )
}

/// Frequency-based context that needs no provider.
pub fn naive_context(request: &LessonRequest) -> SharedContext {
    let keywords = frequency_keywords(&request.source_text);

    let mut key_vocabulary: Vec<String> =
        keywords.iter().take(MAX_KEY_VOCABULARY).cloned().collect();
    if key_vocabulary.is_empty() {
        key_vocabulary = vec![request.lesson_kind.as_str().to_string(), "topic".to_string()];
    }

    let mut main_themes: Vec<String> = keywords.iter().take(NAIVE_THEME_COUNT).cloned().collect();
    if main_themes.is_empty() {
        main_themes = vec![request.lesson_kind.as_str().to_string()];
    }

    let mut content_summary = leading_sentences(&request.source_text);
    if content_summary.is_empty() {
        content_summary = format!("A short {} text.", request.lesson_kind);
    }

    SharedContext {
        key_vocabulary,
        main_themes,
        content_summary,
        difficulty_level: request.proficiency_level,
        source_text: request.source_text.clone(),
        lesson_kind: request.lesson_kind,
        target_language: request.target_language.clone(),
        minimal: false,
        grammar_focus: None,
    }
}

/// Lowercased content words ranked by frequency, ties broken by first occurrence.
pub fn frequency_keywords(text: &str) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let words = text
        .split(|c: char| !(c.is_alphabetic() || c == '\'' || c == '-'))
        .map(|word| word.trim_matches(|c: char| c == '\'' || c == '-').to_lowercase())
        .filter(|word| word.chars().count() >= NAIVE_MIN_WORD_LEN)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()));

    for (position, word) in words.enumerate() {
        counts
            .entry(word)
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, position));
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().map(|(word, _, _)| word).collect()
}

fn leading_sentences(text: &str) -> String {
    let mut summary = String::new();
    for sentence in text.split_inclusive(|c: char| matches!(c, '.' | '!' | '?')) {
        let sentence = sentence.split_whitespace().collect::<Vec<_>>().join(" ");
        if sentence.is_empty() {
            continue;
        }
        let candidate_len = summary.chars().count() + sentence.chars().count() + 1;
        if !summary.is_empty() && candidate_len > SUMMARY_MAX_CHARS {
            break;
        }
        if !summary.is_empty() {
            summary.push(' ');
        }
        summary.push_str(&sentence);
    }
    bound_summary(&summary)
}

fn bound_summary(summary: &str) -> String {
    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= SUMMARY_MAX_CHARS {
        return collapsed;
    }
    // Leave room for the ellipsis so the bound holds.
    prompt::truncate_chars(&collapsed, SUMMARY_MAX_CHARS - 3)
}

fn dedupe_capped(items: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        let folded = trimmed.to_lowercase();
        if seen.contains(&folded) {
            continue;
        }
        seen.push(folded);
        out.push(trimmed.to_string());
        if out.len() == cap {
            break;
        }
    }
    out
}
