//! Section generator strategies.
//!
//! A generator is pure: it turns the shared context, the accepted sections it
//! depends on, and the instruction variant into a prompt, and turns the
//! provider's reply back into typed content. Only the orchestrator calls the
//! provider.

use crate::error::ApiError;
use crate::lesson::content::{GeneratedSection, SectionContent};
use crate::lesson::context::SharedContext;
use crate::lesson::prompt::{self, PromptParts};
use crate::lesson::regeneration::InstructionVariant;
use crate::lesson::sections::SectionKind;
use serde_json::Value;

mod comprehension;
mod dialogue;
mod discussion;
mod grammar;
mod pronunciation;
mod reading;
mod vocabulary;
mod warmup;
mod wrapup;

pub use comprehension::ComprehensionGenerator;
pub use dialogue::{DialogueFillGapGenerator, DialoguePracticeGenerator};
pub use discussion::DiscussionGenerator;
pub use grammar::GrammarGenerator;
pub use pronunciation::PronunciationGenerator;
pub use reading::ReadingGenerator;
pub use vocabulary::VocabularyGenerator;
pub use warmup::WarmupGenerator;
pub use wrapup::WrapupGenerator;

pub trait SectionGenerator: Send + Sync {
    fn kind(&self) -> SectionKind;

    /// Label recorded as `generation_strategy` on the produced section.
    fn strategy(&self) -> &'static str;

    /// Role line of the system prompt.
    fn role(&self) -> &'static str;

    /// Kind-specific task description and JSON shape.
    fn instructions(&self, context: &SharedContext, prior: &[GeneratedSection]) -> String;

    fn build_prompt(
        &self,
        context: &SharedContext,
        prior: &[GeneratedSection],
        variant: &InstructionVariant,
    ) -> PromptParts {
        let mut user = prompt::context_block(context);
        user.push('\n');
        user.push_str(&self.instructions(context, prior));
        if let Some(adjustment) = variant.render() {
            user.push_str("\n\n");
            user.push_str(&adjustment);
        }
        PromptParts {
            system: prompt::system_prompt(self.kind().key(), self.role()),
            user,
        }
    }

    fn parse(&self, raw: &str) -> Result<SectionContent, ApiError> {
        parse_section(self.kind(), raw)
    }
}

static WARMUP: WarmupGenerator = WarmupGenerator;
static VOCABULARY: VocabularyGenerator = VocabularyGenerator;
static READING: ReadingGenerator = ReadingGenerator;
static COMPREHENSION: ComprehensionGenerator = ComprehensionGenerator;
static DIALOGUE_PRACTICE: DialoguePracticeGenerator = DialoguePracticeGenerator;
static DIALOGUE_FILL_GAP: DialogueFillGapGenerator = DialogueFillGapGenerator;
static DISCUSSION: DiscussionGenerator = DiscussionGenerator;
static GRAMMAR: GrammarGenerator = GrammarGenerator;
static PRONUNCIATION: PronunciationGenerator = PronunciationGenerator;
static WRAPUP: WrapupGenerator = WrapupGenerator;

/// Static dispatch from section kind to its generator.
pub fn generator_for(kind: SectionKind) -> &'static dyn SectionGenerator {
    match kind {
        SectionKind::Warmup => &WARMUP,
        SectionKind::Vocabulary => &VOCABULARY,
        SectionKind::Reading => &READING,
        SectionKind::Comprehension => &COMPREHENSION,
        SectionKind::DialoguePractice => &DIALOGUE_PRACTICE,
        SectionKind::DialogueFillGap => &DIALOGUE_FILL_GAP,
        SectionKind::Discussion => &DISCUSSION,
        SectionKind::Grammar => &GRAMMAR,
        SectionKind::Pronunciation => &PRONUNCIATION,
        SectionKind::Wrapup => &WRAPUP,
    }
}

/// Decode a reply for `kind`. Replies without a JSON object are malformed;
/// shape mismatches inside the object are malformed too.
pub fn parse_section(kind: SectionKind, raw: &str) -> Result<SectionContent, ApiError> {
    let value = prompt::extract_json(raw).ok_or_else(|| {
        ApiError::MalformedOutput(format!("{} reply contains no JSON object", kind))
    })?;
    let value = normalize(kind, unwrap_envelope(kind, value));
    SectionContent::from_value(kind, value)
        .map_err(|e| ApiError::MalformedOutput(format!("{} reply has the wrong shape: {}", kind, e)))
}

/// Accept `{"warmup": {...}}` as well as the bare object.
fn unwrap_envelope(kind: SectionKind, value: Value) -> Value {
    let Value::Object(map) = &value else {
        return value;
    };
    if map.len() != 1 {
        return value;
    }
    let wanted = kind.key().replace('_', "");
    let inner = map.iter().find_map(|(key, inner)| {
        let key = key.to_ascii_lowercase().replace(|c: char| c == '_' || c == '-', "");
        (key == wanted && inner.is_object()).then(|| inner.clone())
    });
    inner.unwrap_or(value)
}

/// Flatten list items the model sometimes wraps in objects, e.g.
/// `[{"question": "..."}]` where plain strings are expected.
fn normalize(kind: SectionKind, mut value: Value) -> Value {
    let string_lists: &[&str] = match kind {
        SectionKind::Warmup | SectionKind::Discussion => &["questions"],
        SectionKind::Wrapup => &["reflectionPrompts", "reflection_prompts"],
        SectionKind::Pronunciation => &["tongueTwisters", "tongue_twisters"],
        SectionKind::DialogueFillGap => &["wordBank", "word_bank"],
        _ => &[],
    };
    if let Value::Object(map) = &mut value {
        for key in string_lists {
            if let Some(Value::Array(items)) = map.get_mut(*key) {
                for item in items.iter_mut() {
                    if let Some(text) = flatten_item(item) {
                        *item = Value::String(text);
                    }
                }
            }
        }
    }
    value
}

fn flatten_item(item: &Value) -> Option<String> {
    let Value::Object(fields) = item else {
        return None;
    };
    ["question", "text", "prompt", "value"]
        .iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Accepted content of `kind` among the prior sections.
pub fn prior_content(prior: &[GeneratedSection], kind: SectionKind) -> Option<&SectionContent> {
    prior
        .iter()
        .find(|section| section.section == kind)
        .map(|section| &section.content)
}

/// Accepted vocabulary words, or the context vocabulary when none is available.
fn lesson_terms(context: &SharedContext, prior: &[GeneratedSection]) -> Vec<String> {
    match prior_content(prior, SectionKind::Vocabulary) {
        Some(SectionContent::Vocabulary(vocabulary)) if !vocabulary.terms().is_empty() => {
            vocabulary.terms()
        }
        _ => context.key_vocabulary.clone(),
    }
}
