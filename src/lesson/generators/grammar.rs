use super::{prior_content, SectionGenerator};
use crate::lesson::content::{GeneratedSection, SectionContent};
use crate::lesson::context::SharedContext;
use crate::lesson::prompt;
use crate::lesson::rules::GRAMMAR_MIN_EXERCISES;
use crate::lesson::sections::SectionKind;
use crate::lesson::types::LessonKind;

const TEXT_CHARS: usize = 2500;

pub struct GrammarGenerator;

impl SectionGenerator for GrammarGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Grammar
    }

    fn strategy(&self) -> &'static str {
        "grammar-from-text"
    }

    fn role(&self) -> &'static str {
        "You teach one grammar structure at a time, drawn from real texts."
    }

    fn instructions(&self, context: &SharedContext, prior: &[GeneratedSection]) -> String {
        let text = match prior_content(prior, SectionKind::Reading) {
            Some(SectionContent::Reading(reading)) if !reading.passage.trim().is_empty() => {
                prompt::truncate_chars(reading.passage.trim(), TEXT_CHARS)
            }
            _ => prompt::source_excerpt(context, TEXT_CHARS),
        };
        let depth = if context.lesson_kind == LessonKind::Grammar {
            "Explain the structure in detail; this lesson is about grammar."
        } else {
            "Keep the explanation short and practical."
        };
        format!(
            "Pick ONE grammar point that appears in the text and suits a {level} learner.\n\
             {depth}\n\
             Give its form and its usage, two or three example sentences, and at least {count} exercises.\n\
             Every exercise needs a prompt and the correct answer.\n\n\
             Text:\n{text}\n\n\
             JSON shape: {{\"point\": \"...\", \"explanation\": {{\"form\": \"...\", \"usage\": \"...\"}}, \"examples\": [\"...\"], \"exercises\": [{{\"prompt\": \"...\", \"answer\": \"...\"}}]}}",
            level = context.difficulty_level,
            depth = depth,
            count = GRAMMAR_MIN_EXERCISES,
            text = text,
        )
    }
}
