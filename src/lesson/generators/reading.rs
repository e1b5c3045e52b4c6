use super::{lesson_terms, SectionGenerator};
use crate::lesson::content::GeneratedSection;
use crate::lesson::context::SharedContext;
use crate::lesson::prompt;
use crate::lesson::rules::reading_band;
use crate::lesson::sections::SectionKind;

const SOURCE_EXCERPT_CHARS: usize = 4000;

/// Rewrites the source as a level-adapted reading passage.
pub struct ReadingGenerator;

impl SectionGenerator for ReadingGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Reading
    }

    fn strategy(&self) -> &'static str {
        "reading-level-adaptation"
    }

    fn role(&self) -> &'static str {
        "You adapt authentic texts into graded readers."
    }

    fn instructions(&self, context: &SharedContext, prior: &[GeneratedSection]) -> String {
        format!(
            "Rewrite the source as a reading passage for a {level} learner, {band} long.\n\
             Keep the facts of the source. Use these lesson words where natural: {terms}.\n\
             Give the passage a short title.\n\n\
             Source:\n{excerpt}\n\n\
             JSON shape: {{\"title\": \"...\", \"passage\": \"...\"}}",
            level = context.difficulty_level,
            band = reading_band(context.difficulty_level),
            terms = lesson_terms(context, prior).join(", "),
            excerpt = prompt::source_excerpt(context, SOURCE_EXCERPT_CHARS),
        )
    }
}
