use super::SectionGenerator;
use crate::lesson::content::GeneratedSection;
use crate::lesson::context::SharedContext;
use crate::lesson::prompt;
use crate::lesson::rules::{
    sentence_band, vocabulary_examples_per_word, VOCABULARY_MAX_WORDS, VOCABULARY_MIN_WORDS,
};
use crate::lesson::sections::SectionKind;

const SOURCE_EXCERPT_CHARS: usize = 1500;

/// Level-scaled word list with example sentences from the source domain.
pub struct VocabularyGenerator;

impl SectionGenerator for VocabularyGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Vocabulary
    }

    fn strategy(&self) -> &'static str {
        "vocabulary-level-examples"
    }

    fn role(&self) -> &'static str {
        "You select and explain vocabulary for language learners."
    }

    fn instructions(&self, context: &SharedContext, _prior: &[GeneratedSection]) -> String {
        let examples = vocabulary_examples_per_word(context.difficulty_level);
        format!(
            "Choose {min} to {max} words or phrases from the source that a {level} learner should learn. \
             Prefer items from the key vocabulary list.\n\
             For every word give its part of speech, a simple definition and exactly {examples} example sentences.\n\
             Every example must use the word and stay in the world of the source ({themes}).\n\
             Example sentences should be {band} long.\n\n\
             Source excerpt:\n{excerpt}\n\n\
             JSON shape: {{\"words\": [{{\"word\": \"...\", \"partOfSpeech\": \"...\", \"definition\": \"...\", \"examples\": [\"...\"]}}]}}",
            min = VOCABULARY_MIN_WORDS,
            max = VOCABULARY_MAX_WORDS,
            level = context.difficulty_level,
            examples = examples,
            themes = context.main_themes.join(", "),
            band = sentence_band(context.difficulty_level),
            excerpt = prompt::source_excerpt(context, SOURCE_EXCERPT_CHARS),
        )
    }
}
