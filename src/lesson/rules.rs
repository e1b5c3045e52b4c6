//! Level-parametrized structural rules shared by generators and validators.
//!
//! Generators quote these numbers in their instructions; validators enforce
//! them. Keeping both sides on one table is what makes a regeneration prompt
//! ("generate exactly 5 questions") agree with the check that rejected it.

use crate::lesson::types::ProficiencyLevel;

pub const DISCUSSION_QUESTION_COUNT: usize = 5;
pub const DIALOGUE_MIN_LINES: usize = 12;
pub const FILL_GAP_MIN_GAPS: usize = 4;
pub const GRAMMAR_MIN_EXERCISES: usize = 5;
pub const PRONUNCIATION_MIN_WORDS: usize = 5;
pub const PRONUNCIATION_MIN_TWISTERS: usize = 2;
pub const COMPREHENSION_MIN_QUESTIONS: usize = 5;
pub const WRAPUP_MIN_PROMPTS: usize = 3;
pub const WARMUP_MIN_QUESTIONS: usize = 3;
pub const WARMUP_MAX_QUESTIONS: usize = 5;
pub const VOCABULARY_MIN_WORDS: usize = 5;
pub const VOCABULARY_MAX_WORDS: usize = 10;

/// Marker used for blanks in fill-gap dialogue lines.
pub const GAP_MARKER: &str = "___";

/// Inclusive word-count band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordBand {
    pub min: usize,
    pub max: usize,
}

impl WordBand {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

impl std::fmt::Display for WordBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{} words", self.min, self.max)
    }
}

/// Example sentences required per vocabulary word.
pub fn vocabulary_examples_per_word(level: ProficiencyLevel) -> usize {
    match level {
        ProficiencyLevel::A1 | ProficiencyLevel::A2 => 5,
        ProficiencyLevel::B1 => 4,
        ProficiencyLevel::B2 => 3,
        ProficiencyLevel::C1 => 2,
    }
}

/// Expected length of a single question or example sentence.
pub fn sentence_band(level: ProficiencyLevel) -> WordBand {
    match level {
        ProficiencyLevel::A1 => WordBand::new(3, 12),
        ProficiencyLevel::A2 => WordBand::new(4, 15),
        ProficiencyLevel::B1 => WordBand::new(5, 20),
        ProficiencyLevel::B2 => WordBand::new(6, 26),
        ProficiencyLevel::C1 => WordBand::new(7, 32),
    }
}

/// Expected length of the reading passage.
pub fn reading_band(level: ProficiencyLevel) -> WordBand {
    match level {
        ProficiencyLevel::A1 => WordBand::new(80, 150),
        ProficiencyLevel::A2 => WordBand::new(120, 200),
        ProficiencyLevel::B1 => WordBand::new(180, 280),
        ProficiencyLevel::B2 => WordBand::new(250, 380),
        ProficiencyLevel::C1 => WordBand::new(320, 500),
    }
}

/// How dialogue sentences should read at this level.
pub fn dialogue_style(level: ProficiencyLevel) -> &'static str {
    match level {
        ProficiencyLevel::A1 => {
            "Use short present simple sentences with everyday words. No perfect tenses, no modal verbs in the past."
        }
        ProficiencyLevel::A2 => {
            "Use simple present and present continuous sentences, basic connectors (and, but, because). Avoid modal perfect forms such as 'would have'."
        }
        ProficiencyLevel::B1 => {
            "Mix present, past and future forms with some linking words and common phrasal verbs."
        }
        ProficiencyLevel::B2 => {
            "Use natural, varied sentences with idiomatic expressions, conditionals and reported speech."
        }
        ProficiencyLevel::C1 => {
            "Use complex, idiomatic language: hedging, nuanced opinion, advanced conditionals and inversion."
        }
    }
}

/// How discussion questions should escalate at this level.
pub fn discussion_style(level: ProficiencyLevel) -> &'static str {
    match level {
        ProficiencyLevel::A1 | ProficiencyLevel::A2 => {
            "Ask mostly concrete, factual questions about the learner's life and preferences (Do you...? What is your favourite...?)."
        }
        ProficiencyLevel::B1 => {
            "Move from factual to opinion questions; include at least one comparison or opinion question (What do you think...? Which is better...?)."
        }
        ProficiencyLevel::B2 => {
            "Ask opinion and analytical questions; include at least one question asking why or how, and one comparison."
        }
        ProficiencyLevel::C1 => {
            "Ask analytical and evaluative questions (To what extent...? How far do you agree...? What are the implications...?)."
        }
    }
}
