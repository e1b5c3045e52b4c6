//! Structured content for each section kind.
//!
//! Every struct deserializes leniently (missing fields default to empty) so a
//! provider reply with structural gaps still parses and the gaps surface as
//! validation issues instead of parse failures.

use crate::lesson::rules::GAP_MARKER;
use crate::lesson::sections::SectionKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarmupContent {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub word: String,
    #[serde(alias = "part_of_speech")]
    pub part_of_speech: String,
    pub definition: String,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VocabularyContent {
    pub words: Vec<VocabularyEntry>,
}

impl VocabularyContent {
    pub fn terms(&self) -> Vec<String> {
        self.words
            .iter()
            .map(|entry| entry.word.trim().to_string())
            .filter(|word| !word.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DialogueContent {
    pub setting: String,
    pub characters: Vec<String>,
    pub lines: Vec<DialogueLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FillGapLine {
    pub speaker: String,
    pub text: String,
    pub answer: Option<String>,
}

impl FillGapLine {
    pub fn has_gap(&self) -> bool {
        self.text.contains(GAP_MARKER)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FillGapContent {
    pub instructions: String,
    pub lines: Vec<FillGapLine>,
    #[serde(alias = "word_bank")]
    pub word_bank: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscussionContent {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrammarExplanation {
    pub form: String,
    pub usage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrammarExercise {
    pub prompt: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrammarContent {
    pub point: String,
    pub explanation: GrammarExplanation,
    pub examples: Vec<String>,
    pub exercises: Vec<GrammarExercise>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PronunciationWord {
    pub word: String,
    pub phonetic: String,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PronunciationContent {
    pub words: Vec<PronunciationWord>,
    #[serde(alias = "tongue_twisters")]
    pub tongue_twisters: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReadingContent {
    pub title: String,
    pub passage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComprehensionQuestion {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComprehensionContent {
    pub questions: Vec<ComprehensionQuestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WrapupContent {
    pub summary: String,
    #[serde(alias = "reflection_prompts")]
    pub reflection_prompts: Vec<String>,
}

/// Kind-specific section content. Serialized as the bare inner value; decoding
/// goes through `from_value` because the kind is never inferred from shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionContent {
    Warmup(WarmupContent),
    Vocabulary(VocabularyContent),
    Reading(ReadingContent),
    Comprehension(ComprehensionContent),
    DialoguePractice(DialogueContent),
    DialogueFillGap(FillGapContent),
    Discussion(DiscussionContent),
    Grammar(GrammarContent),
    Pronunciation(PronunciationContent),
    Wrapup(WrapupContent),
}

impl SectionContent {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionContent::Warmup(_) => SectionKind::Warmup,
            SectionContent::Vocabulary(_) => SectionKind::Vocabulary,
            SectionContent::Reading(_) => SectionKind::Reading,
            SectionContent::Comprehension(_) => SectionKind::Comprehension,
            SectionContent::DialoguePractice(_) => SectionKind::DialoguePractice,
            SectionContent::DialogueFillGap(_) => SectionKind::DialogueFillGap,
            SectionContent::Discussion(_) => SectionKind::Discussion,
            SectionContent::Grammar(_) => SectionKind::Grammar,
            SectionContent::Pronunciation(_) => SectionKind::Pronunciation,
            SectionContent::Wrapup(_) => SectionKind::Wrapup,
        }
    }

    /// True when the content carries nothing a learner could use.
    pub fn is_empty(&self) -> bool {
        match self {
            SectionContent::Warmup(c) => non_blank(&c.questions) == 0,
            SectionContent::Vocabulary(c) => c.terms().is_empty(),
            SectionContent::Reading(c) => c.passage.trim().is_empty(),
            SectionContent::Comprehension(c) => {
                c.questions.iter().all(|q| q.question.trim().is_empty())
            }
            SectionContent::DialoguePractice(c) => c.lines.iter().all(|l| l.text.trim().is_empty()),
            SectionContent::DialogueFillGap(c) => c.lines.iter().all(|l| l.text.trim().is_empty()),
            SectionContent::Discussion(c) => non_blank(&c.questions) == 0,
            SectionContent::Grammar(c) => c.point.trim().is_empty() && c.exercises.is_empty(),
            SectionContent::Pronunciation(c) => {
                c.words.iter().all(|w| w.word.trim().is_empty())
                    && non_blank(&c.tongue_twisters) == 0
            }
            SectionContent::Wrapup(c) => {
                c.summary.trim().is_empty() && non_blank(&c.reflection_prompts) == 0
            }
        }
    }

    /// Decode a JSON value into the content type for `kind`.
    pub fn from_value(kind: SectionKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            SectionKind::Warmup => SectionContent::Warmup(serde_json::from_value(value)?),
            SectionKind::Vocabulary => SectionContent::Vocabulary(serde_json::from_value(value)?),
            SectionKind::Reading => SectionContent::Reading(serde_json::from_value(value)?),
            SectionKind::Comprehension => {
                SectionContent::Comprehension(serde_json::from_value(value)?)
            }
            SectionKind::DialoguePractice => {
                SectionContent::DialoguePractice(serde_json::from_value(value)?)
            }
            SectionKind::DialogueFillGap => {
                SectionContent::DialogueFillGap(serde_json::from_value(value)?)
            }
            SectionKind::Discussion => SectionContent::Discussion(serde_json::from_value(value)?),
            SectionKind::Grammar => SectionContent::Grammar(serde_json::from_value(value)?),
            SectionKind::Pronunciation => {
                SectionContent::Pronunciation(serde_json::from_value(value)?)
            }
            SectionKind::Wrapup => SectionContent::Wrapup(serde_json::from_value(value)?),
        })
    }
}

fn non_blank(items: &[String]) -> usize {
    items.iter().filter(|item| !item.trim().is_empty()).count()
}

/// Output of one generator invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSection {
    pub section: SectionKind,
    pub content: SectionContent,
    pub tokens_used: u32,
    pub generation_strategy: String,
}

/// The assembled lesson, one field per section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSections {
    pub warmup: WarmupContent,
    pub vocabulary: VocabularyContent,
    pub dialogue_practice: DialogueContent,
    pub dialogue_fill_gap: FillGapContent,
    pub discussion: DiscussionContent,
    pub grammar: GrammarContent,
    pub pronunciation: PronunciationContent,
    pub reading: ReadingContent,
    pub comprehension: ComprehensionContent,
    pub wrapup: WrapupContent,
}

impl LessonSections {
    pub fn insert(&mut self, content: SectionContent) {
        match content {
            SectionContent::Warmup(c) => self.warmup = c,
            SectionContent::Vocabulary(c) => self.vocabulary = c,
            SectionContent::Reading(c) => self.reading = c,
            SectionContent::Comprehension(c) => self.comprehension = c,
            SectionContent::DialoguePractice(c) => self.dialogue_practice = c,
            SectionContent::DialogueFillGap(c) => self.dialogue_fill_gap = c,
            SectionContent::Discussion(c) => self.discussion = c,
            SectionContent::Grammar(c) => self.grammar = c,
            SectionContent::Pronunciation(c) => self.pronunciation = c,
            SectionContent::Wrapup(c) => self.wrapup = c,
        }
    }
}
