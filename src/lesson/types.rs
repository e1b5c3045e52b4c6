//! Request-side vocabulary: proficiency levels, lesson kinds and the request itself.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CEFR proficiency tier, A1 lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
}

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 5] = [
        ProficiencyLevel::A1,
        ProficiencyLevel::A2,
        ProficiencyLevel::B1,
        ProficiencyLevel::B2,
        ProficiencyLevel::C1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::A1 => "A1",
            ProficiencyLevel::A2 => "A2",
            ProficiencyLevel::B1 => "B1",
            ProficiencyLevel::B2 => "B2",
            ProficiencyLevel::C1 => "C1",
        }
    }

    pub fn is_beginner(&self) -> bool {
        matches!(self, ProficiencyLevel::A1 | ProficiencyLevel::A2)
    }

    pub fn is_advanced(&self) -> bool {
        matches!(self, ProficiencyLevel::B2 | ProficiencyLevel::C1)
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProficiencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Ok(ProficiencyLevel::A1),
            "A2" => Ok(ProficiencyLevel::A2),
            "B1" => Ok(ProficiencyLevel::B1),
            "B2" => Ok(ProficiencyLevel::B2),
            "C1" => Ok(ProficiencyLevel::C1),
            other => Err(format!(
                "Unknown proficiency level '{}' (expected A1, A2, B1, B2 or C1)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Discussion,
    Grammar,
    Travel,
    Business,
    Pronunciation,
}

impl LessonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonKind::Discussion => "discussion",
            LessonKind::Grammar => "grammar",
            LessonKind::Travel => "travel",
            LessonKind::Business => "business",
            LessonKind::Pronunciation => "pronunciation",
        }
    }

    /// One-line emphasis added to every section prompt.
    pub fn focus_hint(&self) -> &'static str {
        match self {
            LessonKind::Discussion => {
                "The lesson centres on conversation and exchanging opinions."
            }
            LessonKind::Grammar => {
                "The lesson centres on noticing and practising one grammar structure."
            }
            LessonKind::Travel => {
                "The lesson centres on practical language for travel situations."
            }
            LessonKind::Business => {
                "The lesson centres on professional and workplace communication."
            }
            LessonKind::Pronunciation => {
                "The lesson centres on sounds, stress and clear pronunciation."
            }
        }
    }
}

impl fmt::Display for LessonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discussion" => Ok(LessonKind::Discussion),
            "grammar" => Ok(LessonKind::Grammar),
            "travel" => Ok(LessonKind::Travel),
            "business" => Ok(LessonKind::Business),
            "pronunciation" => Ok(LessonKind::Pronunciation),
            other => Err(format!(
                "Unknown lesson kind '{}' (expected discussion, grammar, travel, business or pronunciation)",
                other
            )),
        }
    }
}

/// A lesson generation request as received from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRequest {
    pub source_text: String,
    pub lesson_kind: LessonKind,
    pub proficiency_level: ProficiencyLevel,
    pub target_language: String,
}

impl LessonRequest {
    pub fn new(
        source_text: impl Into<String>,
        lesson_kind: LessonKind,
        proficiency_level: ProficiencyLevel,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            lesson_kind,
            proficiency_level,
            target_language: target_language.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.source_text.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "sourceText must not be empty".to_string(),
            ));
        }
        if self.target_language.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "targetLanguage must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
