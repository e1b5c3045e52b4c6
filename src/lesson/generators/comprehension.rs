use super::{prior_content, SectionGenerator};
use crate::lesson::content::{GeneratedSection, SectionContent};
use crate::lesson::context::SharedContext;
use crate::lesson::prompt;
use crate::lesson::rules::COMPREHENSION_MIN_QUESTIONS;
use crate::lesson::sections::SectionKind;

const PASSAGE_CHARS: usize = 3000;

pub struct ComprehensionGenerator;

impl SectionGenerator for ComprehensionGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Comprehension
    }

    fn strategy(&self) -> &'static str {
        "comprehension-from-reading"
    }

    fn role(&self) -> &'static str {
        "You write reading comprehension questions with model answers."
    }

    fn instructions(&self, context: &SharedContext, prior: &[GeneratedSection]) -> String {
        let passage = match prior_content(prior, SectionKind::Reading) {
            Some(SectionContent::Reading(reading)) if !reading.passage.trim().is_empty() => {
                prompt::truncate_chars(reading.passage.trim(), PASSAGE_CHARS)
            }
            _ => prompt::source_excerpt(context, PASSAGE_CHARS),
        };
        format!(
            "Write at least {count} comprehension questions about the passage below, each with a short model answer.\n\
             Mix detail questions with at least one question about the main idea.\n\n\
             Passage:\n{passage}\n\n\
             JSON shape: {{\"questions\": [{{\"question\": \"...\", \"answer\": \"...\"}}]}}",
            count = COMPREHENSION_MIN_QUESTIONS,
            passage = passage,
        )
    }
}
