//! Shared test utilities for integration tests
//!
//! Canned provider replies that pass validation at B1 for the golf source text,
//! plus helpers to build scripted providers and isolate configuration lookups.

use lessonloom::lesson::context::SharedContext;
use lessonloom::provider::{ScriptedProvider, ScriptedReply};
use lessonloom::{LessonKind, LessonRequest, ProficiencyLevel, SectionKind};
use serde_json::{json, Value};
use std::sync::Mutex;
use tempfile::TempDir;

pub const GOLF_SOURCE: &str = "The Masters tournament at Augusta ended on Sunday. \
    Scottie Scheffler won the green jacket after a calm final round. \
    Golf fans watched the leaders putt on fast greens while the weather stayed warm. \
    Many players said the course was the hardest they had seen in years.";

pub const CONTEXT_MARKER: &str = "Lesson section: context.";

/// Routing needle for a section's provider calls.
pub fn marker(kind: SectionKind) -> String {
    format!("Lesson section: {}.", kind.key())
}

pub fn golf_request() -> LessonRequest {
    LessonRequest::new(GOLF_SOURCE, LessonKind::Discussion, ProficiencyLevel::B1, "English")
}

pub fn context_reply() -> Value {
    json!({
        "key_vocabulary": ["tournament", "course", "putt", "green", "leaders"],
        "main_themes": ["golf", "competition"],
        "content_summary": "A golf tournament ends after a calm final round on fast greens."
    })
}

/// The context the pipeline derives from `context_reply` for `golf_request`.
pub fn golf_context() -> SharedContext {
    let mut context = lessonloom::lesson::context::naive_context(&golf_request());
    context.key_vocabulary = vec![
        "tournament".to_string(),
        "course".to_string(),
        "putt".to_string(),
        "green".to_string(),
        "leaders".to_string(),
    ];
    context.main_themes = vec!["golf".to_string(), "competition".to_string()];
    context
}

const READING_PASSAGE: &str = "Every spring, one of the most famous golf tournaments in the world takes place on a beautiful course in the south of the United States. For four days, the best players try to finish the course in as few shots as possible. This year, thousands of fans followed the leaders from hole to hole. The weather stayed warm and dry, so the greens became very fast. On fast greens, even a short putt can be difficult, and many players made small mistakes near the hole. The winner stayed calm during the final round. While other players took risks, he chose safe shots and waited for his chances. On the last few holes, he made two long putts, and the crowd cheered loudly. After the tournament, he said that he had felt nervous in the morning but tried to enjoy every moment. Many people watch the tournament on television because the course looks so green and peaceful. However, the players say it is one of the hardest places to play. The course has narrow fairways, tall trees and a lot of water. For young golfers, winning here is a dream. For fans, it is a chance to see great sport in a special place, and many of them come back every year.";

pub fn warmup_questions() -> Vec<&'static str> {
    vec![
        "Have you ever played golf or mini golf with friends?",
        "What sports do you like to watch on television?",
        "Do you prefer playing sport outside or inside?",
        "How do you feel before an important competition?",
    ]
}

pub fn discussion_questions() -> Vec<&'static str> {
    vec![
        "Do you watch any sport on television at the weekend?",
        "What do you think makes a sport exciting to watch?",
        "Is it better to play sport alone or in a team?",
        "Why do some people stay calm under pressure while others do not?",
        "Should famous players earn more money than teachers or nurses?",
    ]
}

/// A reply for `kind` that validates with no errors against `golf_context`.
pub fn valid_section(kind: SectionKind) -> Value {
    match kind {
        SectionKind::Warmup => json!({ "questions": warmup_questions() }),
        SectionKind::Vocabulary => json!({
            "words": [
                {
                    "word": "tournament",
                    "partOfSpeech": "noun",
                    "definition": "a competition with many players or teams",
                    "examples": [
                        "The tournament starts early on Thursday morning.",
                        "She played in her first tournament last year.",
                        "Our club holds a small tournament every summer.",
                        "Thousands of fans travel to watch the tournament."
                    ]
                },
                {
                    "word": "course",
                    "partOfSpeech": "noun",
                    "definition": "an area of land where people play golf",
                    "examples": [
                        "The golf course was green and very quiet.",
                        "This course has eighteen holes and a small lake.",
                        "He walks around the course every Sunday morning.",
                        "The course was harder than the players expected."
                    ]
                },
                {
                    "word": "putt",
                    "partOfSpeech": "verb",
                    "definition": "to hit the ball gently towards the hole",
                    "examples": [
                        "She needed one short putt to win.",
                        "His last putt rolled past the hole.",
                        "It is hard to putt on fast greens.",
                        "Practise every putt slowly and carefully at home."
                    ]
                },
                {
                    "word": "leader",
                    "partOfSpeech": "noun",
                    "definition": "the person who is winning at the moment",
                    "examples": [
                        "The leader smiled after a very good round.",
                        "After two days she was the clear leader.",
                        "Every leader feels pressure on the final day.",
                        "The leaders walked together to the first tee."
                    ]
                },
                {
                    "word": "calm",
                    "partOfSpeech": "adjective",
                    "definition": "relaxed and not worried or excited",
                    "examples": [
                        "He stayed calm when the wind got stronger.",
                        "A calm player makes fewer mistakes under pressure.",
                        "Try to keep calm before an important shot.",
                        "The lake looked calm on the golf course."
                    ]
                }
            ]
        }),
        SectionKind::Reading => json!({
            "title": "A Week of Golf in the Spring Sun",
            "passage": READING_PASSAGE
        }),
        SectionKind::Comprehension => json!({
            "questions": [
                { "question": "How many days does the tournament last?", "answer": "Four days." },
                { "question": "Why were the greens so fast?", "answer": "The weather was warm and dry." },
                { "question": "How did the winner play in the final round?", "answer": "He stayed calm and chose safe shots." },
                { "question": "How did the winner feel in the morning?", "answer": "He felt nervous." },
                { "question": "What makes the course difficult?", "answer": "Narrow fairways, tall trees and water." }
            ]
        }),
        SectionKind::DialoguePractice => json!({
            "setting": "Two friends talk at a golf club after watching the final round on TV.",
            "characters": ["Anna", "Ben"],
            "lines": [
                { "speaker": "Anna", "text": "Did you watch the golf tournament yesterday?" },
                { "speaker": "Ben", "text": "Yes, I watched the whole final round." },
                { "speaker": "Anna", "text": "The leaders looked so calm on the course." },
                { "speaker": "Ben", "text": "I was nervous just watching every putt." },
                { "speaker": "Anna", "text": "The greens were really fast this year." },
                { "speaker": "Ben", "text": "That is why so many players missed short putts." },
                { "speaker": "Anna", "text": "Do you want to play nine holes on Saturday?" },
                { "speaker": "Ben", "text": "Sure, but I need to practise my putting first." },
                { "speaker": "Anna", "text": "We can go to the practice green in the morning." },
                { "speaker": "Ben", "text": "Great idea. What time should we meet?" },
                { "speaker": "Anna", "text": "Let's meet at nine at the club house." },
                { "speaker": "Ben", "text": "Perfect. I will bring some extra balls." }
            ]
        }),
        SectionKind::DialogueFillGap => json!({
            "instructions": "Complete the dialogue with words from the word bank.",
            "wordBank": ["course", "putt", "calm", "tournament"],
            "lines": [
                { "speaker": "Anna", "text": "Did you watch the golf ___ yesterday?", "answer": "tournament" },
                { "speaker": "Ben", "text": "Yes, I watched the whole final round." },
                { "speaker": "Anna", "text": "The leaders looked so ___ on the course.", "answer": "calm" },
                { "speaker": "Ben", "text": "I was nervous just watching every shot." },
                { "speaker": "Anna", "text": "The greens were really fast this year." },
                { "speaker": "Ben", "text": "That is why so many players missed a short ___.", "answer": "putt" },
                { "speaker": "Anna", "text": "Do you want to play nine holes on Saturday?" },
                { "speaker": "Ben", "text": "Sure, but I need to practise my putting first." },
                { "speaker": "Anna", "text": "We can walk the whole ___ in the morning.", "answer": "course" },
                { "speaker": "Ben", "text": "Great idea. What time should we meet?" },
                { "speaker": "Anna", "text": "Let's meet at nine at the club house." },
                { "speaker": "Ben", "text": "Perfect. I will bring some extra balls." }
            ]
        }),
        SectionKind::Discussion => json!({ "questions": discussion_questions() }),
        SectionKind::Grammar => json!({
            "point": "past simple",
            "explanation": {
                "form": "Regular verbs add -ed; irregular verbs have their own past form.",
                "usage": "Use the past simple for finished actions at a known time in the past."
            },
            "examples": [
                "The fans watched the final round.",
                "He made two long putts."
            ],
            "exercises": [
                { "prompt": "The weather ___ (stay) warm all week.", "answer": "stayed" },
                { "prompt": "The winner ___ (choose) safe shots.", "answer": "chose" },
                { "prompt": "Thousands of fans ___ (follow) the leaders.", "answer": "followed" },
                { "prompt": "He ___ (feel) nervous in the morning.", "answer": "felt" },
                { "prompt": "The crowd ___ (cheer) loudly.", "answer": "cheered" }
            ]
        }),
        SectionKind::Pronunciation => json!({
            "words": [
                { "word": "course", "phonetic": "/kɔːs/", "tips": ["The 'ou' sounds like 'or'."] },
                { "word": "putt", "phonetic": "/pʌt/", "tips": ["Short vowel, like 'cup'."] },
                { "word": "tournament", "phonetic": "/ˈtʊənəmənt/", "tips": ["Stress the first syllable."] },
                { "word": "calm", "phonetic": "/kɑːm/", "tips": ["The 'l' is silent."] },
                { "word": "leader", "phonetic": "/ˈliːdə/", "tips": ["Long 'ee' sound in the first syllable."] }
            ],
            "tongueTwisters": [
                "Paul putts past the pin on the pretty green.",
                "Calm Carl keeps clubs clean on the course."
            ]
        }),
        SectionKind::Wrapup => json!({
            "summary": "We learned golf words, read about a famous tournament and practised the past simple.",
            "reflectionPrompts": [
                "Which new word will you use this week?",
                "What did you find difficult in the dialogue?",
                "How would you describe your favourite sport in the past simple?"
            ]
        }),
    }
}

/// Scripted provider that answers every call with valid content.
pub fn happy_provider() -> ScriptedProvider {
    SectionKind::ALL.into_iter().fold(
        ScriptedProvider::new().route(CONTEXT_MARKER, vec![ScriptedReply::json(context_reply())]),
        |provider, kind| {
            provider.route(marker(kind), vec![ScriptedReply::json(valid_section(kind))])
        },
    )
}

/// Like `happy_provider`, but `kind` is answered by `replies` in order.
pub fn provider_with(kind: SectionKind, replies: Vec<ScriptedReply>) -> ScriptedProvider {
    provider_with_routes(vec![(kind, replies)])
}

/// Like `happy_provider`, with every listed section answered by its own replies.
pub fn provider_with_routes(overrides: Vec<(SectionKind, Vec<ScriptedReply>)>) -> ScriptedProvider {
    SectionKind::ALL.into_iter().fold(
        ScriptedProvider::new().route(CONTEXT_MARKER, vec![ScriptedReply::json(context_reply())]),
        |provider, section| {
            let replies = overrides
                .iter()
                .find(|(kind, _)| *kind == section)
                .map(|(_, replies)| replies.clone())
                .unwrap_or_else(|| vec![ScriptedReply::json(valid_section(section))]);
            provider.route(marker(section), replies)
        },
    )
}

/// Vocabulary reply with five short examples per word, as A1 and A2 require.
pub fn beginner_vocabulary() -> Value {
    let entry = |word: &str, part: &str, definition: &str, examples: [&str; 5]| {
        json!({
            "word": word,
            "partOfSpeech": part,
            "definition": definition,
            "examples": examples
        })
    };
    json!({
        "words": [
            entry("golf", "noun", "a sport with a small ball and a club", [
                "I play golf with my dad.",
                "Golf is a quiet sport.",
                "She watches golf on TV.",
                "We like golf on Sundays.",
                "My friend has new golf clubs.",
            ]),
            entry("course", "noun", "the land where people play golf", [
                "The course is very big.",
                "This course has a small lake.",
                "We walk around the course.",
                "The course is green in spring.",
                "Our course is near the sea.",
            ]),
            entry("putt", "verb", "to hit the ball gently to the hole", [
                "I putt the ball slowly.",
                "He can putt very well.",
                "She putts on the green.",
                "They putt in the morning.",
                "We putt and the ball goes in.",
            ]),
            entry("green", "noun", "the short grass around the hole", [
                "The green is very fast.",
                "The ball is on the green.",
                "We walk to the green.",
                "The green looks very nice.",
                "He stands on the green.",
            ]),
            entry("fan", "noun", "a person who loves a sport or a player", [
                "I am a big golf fan.",
                "The fans are very happy.",
                "Every fan has a ticket.",
                "My sister is a fan too.",
                "The fans clap for the winner.",
            ]),
        ]
    })
}

/// Dialogue reply that is valid except for one modal perfect line.
pub fn dialogue_with_modal_perfect() -> Value {
    let mut reply = valid_section(SectionKind::DialoguePractice);
    reply["lines"][3]["text"] = json!("We should have seen the last putt at the course.");
    reply
}

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: &[&str] = &[
    "LESSONLOOM_CONFIG_DIR",
    "LESSONLOOM_ENV",
    "LESSONLOOM__PROVIDER__MODEL",
    "LESSONLOOM__PROVIDER__API_KEY",
    "LESSONLOOM__GENERATION__TEMPERATURE",
    "LESSONLOOM__GENERATION__MAX_TOKENS",
    "ANTHROPIC_API_KEY",
];

/// Run `f` with the global config directory pointed at `test_dir` and the
/// lessonloom environment variables cleared; the previous values are restored.
pub fn with_isolated_config<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> = ISOLATED_VARS
        .iter()
        .map(|var| (*var, std::env::var(var).ok()))
        .collect();
    for var in ISOLATED_VARS {
        std::env::remove_var(var);
    }
    std::env::set_var("LESSONLOOM_CONFIG_DIR", test_dir.path());

    let result = f();

    for (var, value) in saved {
        match value {
            Some(value) => std::env::set_var(var, value),
            None => std::env::remove_var(var),
        }
    }
    result
}
