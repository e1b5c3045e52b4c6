use super::{lesson_terms, prior_content, SectionGenerator};
use crate::lesson::content::{GeneratedSection, SectionContent};
use crate::lesson::context::SharedContext;
use crate::lesson::rules::WRAPUP_MIN_PROMPTS;
use crate::lesson::sections::SectionKind;

pub struct WrapupGenerator;

impl SectionGenerator for WrapupGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::Wrapup
    }

    fn strategy(&self) -> &'static str {
        "wrapup-recap"
    }

    fn role(&self) -> &'static str {
        "You close language lessons with a recap and reflection."
    }

    fn instructions(&self, context: &SharedContext, prior: &[GeneratedSection]) -> String {
        let grammar = match prior_content(prior, SectionKind::Grammar) {
            Some(SectionContent::Grammar(grammar)) if !grammar.point.trim().is_empty() => {
                grammar.point.clone()
            }
            _ => context
                .grammar_focus
                .clone()
                .unwrap_or_else(|| "none".to_string()),
        };
        let discussion = match prior_content(prior, SectionKind::Discussion) {
            Some(SectionContent::Discussion(discussion)) => discussion
                .questions
                .first()
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        };
        format!(
            "Write a short summary of what the learner practised and at least {count} reflection prompts addressed to the learner.\n\
             Vocabulary covered: {terms}.\n\
             Grammar point: {grammar}.\n\
             Discussion started with: {discussion}\n\n\
             JSON shape: {{\"summary\": \"...\", \"reflectionPrompts\": [\"...\"]}}",
            count = WRAPUP_MIN_PROMPTS,
            terms = lesson_terms(context, prior).join(", "),
            grammar = grammar,
            discussion = discussion,
        )
    }
}
