//! Dialogue practice and the fill-gap exercise built on top of it.

use super::{lesson_terms, prior_content, SectionGenerator};
use crate::lesson::content::{GeneratedSection, SectionContent};
use crate::lesson::context::SharedContext;
use crate::lesson::rules::{dialogue_style, DIALOGUE_MIN_LINES, FILL_GAP_MIN_GAPS, GAP_MARKER};
use crate::lesson::sections::SectionKind;

const QUOTED_LINES: usize = 16;

pub struct DialoguePracticeGenerator;

impl SectionGenerator for DialoguePracticeGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::DialoguePractice
    }

    fn strategy(&self) -> &'static str {
        "dialogue-level-scaled"
    }

    fn role(&self) -> &'static str {
        "You write natural dialogues for language learners to read aloud in pairs."
    }

    fn instructions(&self, context: &SharedContext, prior: &[GeneratedSection]) -> String {
        format!(
            "Write a dialogue between two named characters with at least {lines} lines.\n\
             Set it in an everyday situation connected to: {themes}.\n\
             Use these lesson words: {terms}.\n\
             Language level: {style}\n\n\
             JSON shape: {{\"setting\": \"...\", \"characters\": [\"...\", \"...\"], \"lines\": [{{\"speaker\": \"...\", \"text\": \"...\"}}]}}",
            lines = DIALOGUE_MIN_LINES,
            themes = context.main_themes.join(", "),
            terms = lesson_terms(context, prior).join(", "),
            style = dialogue_style(context.difficulty_level),
        )
    }
}

pub struct DialogueFillGapGenerator;

impl SectionGenerator for DialogueFillGapGenerator {
    fn kind(&self) -> SectionKind {
        SectionKind::DialogueFillGap
    }

    fn strategy(&self) -> &'static str {
        "dialogue-fill-gap"
    }

    fn role(&self) -> &'static str {
        "You turn dialogues into gap-fill exercises for language learners."
    }

    fn instructions(&self, context: &SharedContext, prior: &[GeneratedSection]) -> String {
        let base = match prior_content(prior, SectionKind::DialoguePractice) {
            Some(SectionContent::DialoguePractice(dialogue)) if !dialogue.lines.is_empty() => {
                let quoted = dialogue
                    .lines
                    .iter()
                    .take(QUOTED_LINES)
                    .map(|line| format!("{}: {}", line.speaker, line.text))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "Write a new dialogue of the same kind as this one, with different lines:\n{}\n",
                    quoted
                )
            }
            _ => format!(
                "Write a dialogue between two characters about: {}.\n",
                context.main_themes.join(", ")
            ),
        };
        format!(
            "{base}\
             The dialogue needs at least {lines} lines.\n\
             In at least {gaps} lines replace one lesson word with {marker} and give the missing word as \"answer\".\n\
             Lesson words: {terms}.\n\
             Put every answer in the word bank. Add one sentence of instructions for the learner.\n\
             Language level: {style}\n\n\
             JSON shape: {{\"instructions\": \"...\", \"lines\": [{{\"speaker\": \"...\", \"text\": \"...\", \"answer\": \"...\"}}], \"wordBank\": [\"...\"]}}",
            base = base,
            lines = DIALOGUE_MIN_LINES,
            gaps = FILL_GAP_MIN_GAPS,
            marker = GAP_MARKER,
            terms = lesson_terms(context, prior).join(", "),
            style = dialogue_style(context.difficulty_level),
        )
    }
}
