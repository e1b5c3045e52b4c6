//! Prompt assembly and reply decoding shared by the context builder and generators.

use crate::lesson::context::SharedContext;
use crate::provider::ChatMessage;
use serde_json::Value;

/// System and user prompt for one provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptParts {
    pub system: String,
    pub user: String,
}

impl PromptParts {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(self.system), ChatMessage::user(self.user)]
    }
}

/// First line of every system prompt; routes scripted providers and tags logs.
pub fn section_marker(key: &str) -> String {
    format!("Lesson section: {}.", key)
}

/// Standard system prompt: marker, role, and the strict-JSON contract.
pub fn system_prompt(key: &str, role: &str) -> String {
    format!(
        "{}\n{}\nRespond with a single JSON object and nothing else. Do not wrap it in prose.",
        section_marker(key),
        role
    )
}

/// Lesson-wide context block quoted at the top of every section prompt.
pub fn context_block(context: &SharedContext) -> String {
    let mut block = format!(
        "Target language: {}\nLearner level: {} (CEFR)\nLesson type: {}. {}\n",
        context.target_language,
        context.difficulty_level,
        context.lesson_kind,
        context.lesson_kind.focus_hint()
    );
    block.push_str(&format!("Main themes: {}\n", context.main_themes.join(", ")));
    block.push_str(&format!(
        "Key vocabulary: {}\n",
        context.key_vocabulary.join(", ")
    ));
    block.push_str(&format!("Summary of the source: {}\n", context.content_summary));
    if let Some(focus) = &context.grammar_focus {
        block.push_str(&format!("Grammar focus of this lesson: {}\n", focus));
    }
    if context.minimal {
        block.push_str("The source text is very short; stay general and rely on the themes.\n");
    }
    block
}

/// Bounded excerpt of the source text for prompts that need the original wording.
pub fn source_excerpt(context: &SharedContext, max_chars: usize) -> String {
    truncate_chars(context.source_text.trim(), max_chars)
}

/// Truncate at a word boundary without splitting a UTF-8 character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(char::is_whitespace) {
        Some(index) if index > max_chars / 2 => format!("{}...", cut[..index].trim_end()),
        _ => format!("{}...", cut.trim_end()),
    }
}

/// Extract the JSON object from a provider reply.
///
/// Accepts bare JSON, fenced code blocks and replies with prose around the
/// object. Returns `None` when no object can be decoded.
pub fn extract_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() {
            return Some(value);
        }
    }

    let unfenced = strip_code_fence(trimmed);
    if let Ok(value) = serde_json::from_str::<Value>(unfenced) {
        if value.is_object() {
            return Some(value);
        }
    }

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&unfenced[start..=end])
        .ok()
        .filter(Value::is_object)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Word count on whitespace boundaries.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
