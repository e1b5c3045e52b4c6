use super::{lesson_terms, SectionGenerator};
use crate::lesson::content::GeneratedSection;
use crate::lesson::context::SharedContext;
use crate::lesson::rules::{PRONUNCIATION_MIN_TWISTERS, PRONUNCIATION_MIN_WORDS};
use crate::lesson::sections::SectionKind;

pub struct PronunciationGenerator;

impl SectionGenerator for PronunciationGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Pronunciation
    }

    fn strategy(&self) -> &'static str {
        "pronunciation-lesson-words"
    }

    fn role(&self) -> &'static str {
        "You coach pronunciation for language learners."
    }

    fn instructions(&self, context: &SharedContext, prior: &[GeneratedSection]) -> String {
        format!(
            "Pick at least {words} words from this list that are hard to pronounce: {terms}.\n\
             For each give an IPA transcription and at least one practical tip.\n\
             Then write at least {twisters} short tongue twisters about {themes}.\n\n\
             JSON shape: {{\"words\": [{{\"word\": \"...\", \"phonetic\": \"/.../\", \"tips\": [\"...\"]}}], \"tongueTwisters\": [\"...\"]}}",
            words = PRONUNCIATION_MIN_WORDS,
            terms = lesson_terms(context, prior).join(", "),
            twisters = PRONUNCIATION_MIN_TWISTERS,
            themes = context.main_themes.join(", "),
        )
    }
}
