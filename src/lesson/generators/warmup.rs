use super::SectionGenerator;
use crate::lesson::content::GeneratedSection;
use crate::lesson::context::SharedContext;
use crate::lesson::rules::{sentence_band, WARMUP_MAX_QUESTIONS, WARMUP_MIN_QUESTIONS};
use crate::lesson::sections::SectionKind;

/// Personal warm-up questions that never reveal the source.
pub struct WarmupGenerator;

impl SectionGenerator for WarmupGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Warmup
    }

    fn strategy(&self) -> &'static str {
        "warmup-personal-experience"
    }

    fn role(&self) -> &'static str {
        "You write warm-up questions that activate a learner's own experience before a lesson."
    }

    fn instructions(&self, context: &SharedContext, _prior: &[GeneratedSection]) -> String {
        format!(
            "Write {min} to {max} warm-up questions about the general themes ({themes}).\n\
             Rules:\n\
             - Ask about the learner's own life, habits, opinions and experience (use \"you\").\n\
             - Good openings: \"Have you ever...\", \"What do you think about...\", \"Do you prefer...\".\n\
             - Do not mention any person, place, organisation, event or result from the source text.\n\
             - Do not ask what happened, who won, or what anyone in the text did or said.\n\
             - Each question should be {band} long.\n\n\
             JSON shape: {{\"questions\": [\"...\"]}}",
            min = WARMUP_MIN_QUESTIONS,
            max = WARMUP_MAX_QUESTIONS,
            themes = context.main_themes.join(", "),
            band = sentence_band(context.difficulty_level),
        )
    }
}
