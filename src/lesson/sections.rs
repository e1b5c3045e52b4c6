//! Fixed section topology.
//!
//! The table is compile-time data. `execution_order` derives the single
//! deterministic order the orchestrator walks: dependencies first, lower
//! priority number first among sections that are ready at the same time.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Warmup,
    Vocabulary,
    Reading,
    Comprehension,
    DialoguePractice,
    DialogueFillGap,
    Discussion,
    Grammar,
    Pronunciation,
    Wrapup,
}

impl SectionKind {
    pub const ALL: [SectionKind; 10] = [
        SectionKind::Warmup,
        SectionKind::Vocabulary,
        SectionKind::Reading,
        SectionKind::Comprehension,
        SectionKind::DialoguePractice,
        SectionKind::DialogueFillGap,
        SectionKind::Discussion,
        SectionKind::Grammar,
        SectionKind::Pronunciation,
        SectionKind::Wrapup,
    ];

    /// Stable snake_case key used in prompts, logs and metrics.
    pub fn key(&self) -> &'static str {
        match self {
            SectionKind::Warmup => "warmup",
            SectionKind::Vocabulary => "vocabulary",
            SectionKind::Reading => "reading",
            SectionKind::Comprehension => "comprehension",
            SectionKind::DialoguePractice => "dialogue_practice",
            SectionKind::DialogueFillGap => "dialogue_fill_gap",
            SectionKind::Discussion => "discussion",
            SectionKind::Grammar => "grammar",
            SectionKind::Pronunciation => "pronunciation",
            SectionKind::Wrapup => "wrapup",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key
            .trim()
            .to_ascii_lowercase()
            .replace(|c: char| c == '-' || c == ' ' || c == '_', "");
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.key().replace('_', "") == normalized)
    }

    pub fn spec(&self) -> &'static SectionSpec {
        SECTION_TABLE
            .iter()
            .find(|spec| spec.kind == *self)
            .unwrap_or(&SECTION_TABLE[0])
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Static description of one section kind.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub kind: SectionKind,
    pub priority: u8,
    pub dependencies: &'static [SectionKind],
}

pub const SECTION_TABLE: [SectionSpec; 10] = [
    SectionSpec {
        kind: SectionKind::Warmup,
        priority: 1,
        dependencies: &[],
    },
    SectionSpec {
        kind: SectionKind::Vocabulary,
        priority: 2,
        dependencies: &[],
    },
    SectionSpec {
        kind: SectionKind::Reading,
        priority: 3,
        dependencies: &[SectionKind::Vocabulary],
    },
    SectionSpec {
        kind: SectionKind::Comprehension,
        priority: 4,
        dependencies: &[SectionKind::Reading],
    },
    SectionSpec {
        kind: SectionKind::DialoguePractice,
        priority: 5,
        dependencies: &[SectionKind::Vocabulary],
    },
    SectionSpec {
        kind: SectionKind::DialogueFillGap,
        priority: 6,
        dependencies: &[SectionKind::Vocabulary, SectionKind::DialoguePractice],
    },
    SectionSpec {
        kind: SectionKind::Discussion,
        priority: 7,
        dependencies: &[SectionKind::Vocabulary],
    },
    SectionSpec {
        kind: SectionKind::Grammar,
        priority: 8,
        dependencies: &[SectionKind::Reading],
    },
    SectionSpec {
        kind: SectionKind::Pronunciation,
        priority: 9,
        dependencies: &[SectionKind::Vocabulary],
    },
    SectionSpec {
        kind: SectionKind::Wrapup,
        priority: 10,
        dependencies: &[
            SectionKind::Vocabulary,
            SectionKind::Discussion,
            SectionKind::Grammar,
        ],
    },
];

/// Topological order of the section table, priority breaking ties.
pub fn execution_order() -> Vec<SectionKind> {
    let mut ordered: Vec<SectionKind> = Vec::with_capacity(SECTION_TABLE.len());
    let mut remaining: Vec<&SectionSpec> = SECTION_TABLE.iter().collect();
    remaining.sort_by_key(|spec| spec.priority);

    while !remaining.is_empty() {
        let ready = remaining
            .iter()
            .position(|spec| spec.dependencies.iter().all(|dep| ordered.contains(dep)));
        match ready {
            Some(index) => ordered.push(remaining.remove(index).kind),
            // A cycle cannot be expressed in the const table above; stop rather than spin.
            None => break,
        }
    }
    ordered
}
