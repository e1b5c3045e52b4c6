//! Minimal safe content for a section whose best attempt came back empty.
//!
//! Built only from the shared context, never from the source's names or
//! events. Always reported as a placeholder in the quality report.

use crate::lesson::content::{
    ComprehensionContent, ComprehensionQuestion, DialogueContent, DialogueLine, DiscussionContent,
    FillGapContent, FillGapLine, GrammarContent, GrammarExercise, GrammarExplanation,
    PronunciationContent, PronunciationWord, ReadingContent, SectionContent, VocabularyContent,
    VocabularyEntry, WarmupContent, WrapupContent,
};
use crate::lesson::context::SharedContext;
use crate::lesson::rules::{
    vocabulary_examples_per_word, COMPREHENSION_MIN_QUESTIONS, DIALOGUE_MIN_LINES,
    DISCUSSION_QUESTION_COUNT, GRAMMAR_MIN_EXERCISES, GAP_MARKER, PRONUNCIATION_MIN_WORDS,
    VOCABULARY_MIN_WORDS, WRAPUP_MIN_PROMPTS,
};
use crate::lesson::sections::SectionKind;

fn theme(context: &SharedContext) -> String {
    context
        .main_themes
        .first()
        .cloned()
        .unwrap_or_else(|| context.lesson_kind.as_str().to_string())
}

/// The `n`th context term, cycling through vocabulary then themes.
fn term(context: &SharedContext, n: usize) -> String {
    let pool: Vec<&String> = context
        .key_vocabulary
        .iter()
        .chain(context.main_themes.iter())
        .collect();
    if pool.is_empty() {
        return context.lesson_kind.as_str().to_string();
    }
    pool[n % pool.len()].clone()
}

pub fn placeholder_for(kind: SectionKind, context: &SharedContext) -> SectionContent {
    let theme = theme(context);
    match kind {
        SectionKind::Warmup => SectionContent::Warmup(WarmupContent {
            questions: vec![
                format!("What do you already know about {}?", theme),
                format!("Have you ever talked about {} with friends?", theme),
                format!("Why might {} be interesting for you?", theme),
            ],
        }),
        SectionKind::Vocabulary => {
            let examples = vocabulary_examples_per_word(context.difficulty_level);
            SectionContent::Vocabulary(VocabularyContent {
                words: (0..VOCABULARY_MIN_WORDS)
                    .map(|n| {
                        let word = term(context, n);
                        VocabularyEntry {
                            definition: format!("A word from this lesson about {}.", theme),
                            part_of_speech: String::new(),
                            examples: (0..examples)
                                .map(|i| format!("Example {}: I can use \"{}\" today.", i + 1, word))
                                .collect(),
                            word,
                        }
                    })
                    .collect(),
            })
        }
        SectionKind::Reading => SectionContent::Reading(ReadingContent {
            title: theme.clone(),
            passage: context.content_summary.clone(),
        }),
        SectionKind::Comprehension => SectionContent::Comprehension(ComprehensionContent {
            questions: (0..COMPREHENSION_MIN_QUESTIONS)
                .map(|n| ComprehensionQuestion {
                    question: format!("What does the text say about {}?", term(context, n)),
                    answer: "Answers will vary.".to_string(),
                })
                .collect(),
        }),
        SectionKind::DialoguePractice => SectionContent::DialoguePractice(DialogueContent {
            setting: format!("Two learners talk about {}.", theme),
            characters: vec!["A".to_string(), "B".to_string()],
            lines: (0..DIALOGUE_MIN_LINES)
                .map(|n| DialogueLine {
                    speaker: speaker(n),
                    text: format!("I want to talk about {}.", term(context, n)),
                })
                .collect(),
        }),
        SectionKind::DialogueFillGap => SectionContent::DialogueFillGap(FillGapContent {
            instructions: "Complete each line with a word from the box.".to_string(),
            lines: (0..DIALOGUE_MIN_LINES)
                .map(|n| FillGapLine {
                    speaker: speaker(n),
                    text: format!("I want to talk about {}.", GAP_MARKER),
                    answer: Some(term(context, n)),
                })
                .collect(),
            word_bank: (0..DIALOGUE_MIN_LINES).map(|n| term(context, n)).collect(),
        }),
        SectionKind::Discussion => SectionContent::Discussion(DiscussionContent {
            questions: (0..DISCUSSION_QUESTION_COUNT)
                .map(|n| format!("What do you think about {}?", term(context, n)))
                .collect(),
        }),
        SectionKind::Grammar => SectionContent::Grammar(GrammarContent {
            point: context
                .grammar_focus
                .clone()
                .unwrap_or_else(|| "present simple".to_string()),
            explanation: GrammarExplanation {
                form: "Review the form with your teacher.".to_string(),
                usage: "Review the usage with your teacher.".to_string(),
            },
            examples: Vec::new(),
            exercises: (0..GRAMMAR_MIN_EXERCISES)
                .map(|n| GrammarExercise {
                    prompt: format!("Write a sentence with \"{}\".", term(context, n)),
                    answer: "Answers will vary.".to_string(),
                })
                .collect(),
        }),
        SectionKind::Pronunciation => SectionContent::Pronunciation(PronunciationContent {
            words: (0..PRONUNCIATION_MIN_WORDS)
                .map(|n| PronunciationWord {
                    word: term(context, n),
                    phonetic: String::new(),
                    tips: vec!["Listen and repeat slowly.".to_string()],
                })
                .collect(),
            tongue_twisters: Vec::new(),
        }),
        SectionKind::Wrapup => SectionContent::Wrapup(WrapupContent {
            summary: format!("Today we worked with language about {}.", theme),
            reflection_prompts: (0..WRAPUP_MIN_PROMPTS)
                .map(|n| format!("How will you use \"{}\" this week?", term(context, n)))
                .collect(),
        }),
    }
}

fn speaker(n: usize) -> String {
    if n % 2 == 0 { "A" } else { "B" }.to_string()
}
