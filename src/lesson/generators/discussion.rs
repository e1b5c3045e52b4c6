use super::{lesson_terms, SectionGenerator};
use crate::lesson::content::GeneratedSection;
use crate::lesson::context::SharedContext;
use crate::lesson::rules::{discussion_style, sentence_band, DISCUSSION_QUESTION_COUNT};
use crate::lesson::sections::SectionKind;

pub struct DiscussionGenerator;

impl SectionGenerator for DiscussionGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Discussion
    }

    fn strategy(&self) -> &'static str {
        "discussion-escalating"
    }

    fn role(&self) -> &'static str {
        "You write discussion questions that get language learners talking."
    }

    fn instructions(&self, context: &SharedContext, prior: &[GeneratedSection]) -> String {
        format!(
            "Write exactly {count} discussion questions about: {themes}.\n\
             Order them from easier to more demanding. {style}\n\
             Use some of these lesson words: {terms}.\n\
             Each question should be {band} long.\n\n\
             JSON shape: {{\"questions\": [\"...\"]}}",
            count = DISCUSSION_QUESTION_COUNT,
            themes = context.main_themes.join(", "),
            style = discussion_style(context.difficulty_level),
            terms = lesson_terms(context, prior).join(", "),
            band = sentence_band(context.difficulty_level),
        )
    }
}
