//! CLI presentation: lesson, quality report and validation formatting (text and JSON).

use crate::error::ApiError;
use crate::lesson::content::LessonSections;
use crate::lesson::quality::{QualityReport, QualitySectionReport};
use crate::lesson::{LessonArtifact, SectionKind, Severity, ValidationResult};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn title_for(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Warmup => "Warm-up",
        SectionKind::Vocabulary => "Vocabulary",
        SectionKind::Reading => "Reading",
        SectionKind::Comprehension => "Comprehension",
        SectionKind::DialoguePractice => "Dialogue",
        SectionKind::DialogueFillGap => "Dialogue: fill the gaps",
        SectionKind::Discussion => "Discussion",
        SectionKind::Grammar => "Grammar",
        SectionKind::Pronunciation => "Pronunciation",
        SectionKind::Wrapup => "Wrap-up",
    }
}

fn numbered(out: &mut String, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, item));
    }
}

/// Human-readable lesson in classroom order.
pub fn format_lesson_text(sections: &LessonSections) -> String {
    let mut out = String::new();
    for kind in SectionKind::ALL {
        out.push_str(&format!("{}\n\n", format_section_heading(title_for(kind))));
        match kind {
            SectionKind::Warmup => numbered(&mut out, &sections.warmup.questions),
            SectionKind::Vocabulary => {
                for entry in &sections.vocabulary.words {
                    if entry.part_of_speech.is_empty() {
                        out.push_str(&format!("  {}: {}\n", entry.word.bold(), entry.definition));
                    } else {
                        out.push_str(&format!(
                            "  {} ({}): {}\n",
                            entry.word.bold(),
                            entry.part_of_speech,
                            entry.definition
                        ));
                    }
                    for example in &entry.examples {
                        out.push_str(&format!("      - {}\n", example));
                    }
                }
            }
            SectionKind::Reading => {
                if !sections.reading.title.is_empty() {
                    out.push_str(&format!("  {}\n\n", sections.reading.title.italic()));
                }
                out.push_str(&format!("  {}\n", sections.reading.passage));
            }
            SectionKind::Comprehension => {
                for (i, q) in sections.comprehension.questions.iter().enumerate() {
                    out.push_str(&format!("  {}. {}\n     -> {}\n", i + 1, q.question, q.answer));
                }
            }
            SectionKind::DialoguePractice => {
                if !sections.dialogue_practice.setting.is_empty() {
                    out.push_str(&format!("  {}\n\n", sections.dialogue_practice.setting.italic()));
                }
                for line in &sections.dialogue_practice.lines {
                    out.push_str(&format!("  {}: {}\n", line.speaker.bold(), line.text));
                }
            }
            SectionKind::DialogueFillGap => {
                let gap = &sections.dialogue_fill_gap;
                if !gap.instructions.is_empty() {
                    out.push_str(&format!("  {}\n", gap.instructions));
                }
                if !gap.word_bank.is_empty() {
                    out.push_str(&format!("  Word bank: {}\n", gap.word_bank.join(", ")));
                }
                out.push('\n');
                for line in &gap.lines {
                    out.push_str(&format!("  {}: {}\n", line.speaker.bold(), line.text));
                }
            }
            SectionKind::Discussion => numbered(&mut out, &sections.discussion.questions),
            SectionKind::Grammar => {
                let grammar = &sections.grammar;
                out.push_str(&format!("  {}\n", grammar.point.bold()));
                out.push_str(&format!("  Form: {}\n", grammar.explanation.form));
                out.push_str(&format!("  Use: {}\n", grammar.explanation.usage));
                for example in &grammar.examples {
                    out.push_str(&format!("      - {}\n", example));
                }
                out.push('\n');
                for (i, exercise) in grammar.exercises.iter().enumerate() {
                    out.push_str(&format!(
                        "  {}. {}   [{}]\n",
                        i + 1,
                        exercise.prompt,
                        exercise.answer
                    ));
                }
            }
            SectionKind::Pronunciation => {
                for word in &sections.pronunciation.words {
                    out.push_str(&format!("  {} {}\n", word.word.bold(), word.phonetic));
                    for tip in &word.tips {
                        out.push_str(&format!("      - {}\n", tip));
                    }
                }
                for twister in &sections.pronunciation.tongue_twisters {
                    out.push_str(&format!("  * {}\n", twister));
                }
            }
            SectionKind::Wrapup => {
                out.push_str(&format!("  {}\n\n", sections.wrapup.summary));
                numbered(&mut out, &sections.wrapup.reflection_prompts);
            }
        }
        out.push('\n');
    }
    out
}

fn status_cell(section: &QualitySectionReport) -> Cell {
    if section.placeholder {
        Cell::new("placeholder").fg(Color::Red)
    } else if section.accepted_valid {
        Cell::new("ok").fg(Color::Green)
    } else {
        Cell::new("best effort").fg(Color::Yellow)
    }
}

/// Quality report as a per-section table plus totals.
pub fn format_quality_report_text(report: &QualityReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Quality report")));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec![
        "Section", "Attempts", "Score", "Errors", "Warnings", "Tokens", "Time (ms)", "Status",
    ]);
    for section in &report.sections {
        table.add_row(vec![
            Cell::new(section.section.key()),
            Cell::new(section.attempt_count),
            Cell::new(section.validation_score),
            Cell::new(section.issue_count),
            Cell::new(section.warning_count),
            Cell::new(section.tokens_used),
            Cell::new(section.generation_time_ms),
            status_cell(section),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!(
        "  Attempts: {} ({} regenerations)\n  Tokens: {} (context {})\n  Average score: {}\n  Duration: {} ms\n",
        report.total_attempts,
        report.total_regenerations,
        report.total_tokens,
        report.context_tokens,
        report.average_score(),
        report.duration_ms,
    ));
    if report.context_fallback {
        out.push_str(&format!(
            "  {}\n",
            "Context was built without the provider (naive extraction).".yellow()
        ));
    }
    let placeholders = report.placeholder_count();
    if placeholders > 0 {
        out.push_str(&format!(
            "  {}\n",
            format!("{} section(s) fell back to placeholder content.", placeholders).red()
        ));
    }
    out.push_str(&format!("  Reference: {}\n", report.correlation_id));
    out
}

pub fn format_artifact_text(artifact: &LessonArtifact) -> String {
    format!(
        "{}{}",
        format_lesson_text(&artifact.sections),
        format_quality_report_text(&artifact.quality_report)
    )
}

pub fn format_artifact_json(artifact: &LessonArtifact) -> Result<String, ApiError> {
    serde_json::to_string_pretty(artifact)
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize lesson: {}", e)))
}

pub fn format_validation_text(kind: SectionKind, result: &ValidationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("Validation: {}", kind.key()))
    ));
    let verdict = if result.is_valid {
        format!("{}", "valid".green())
    } else {
        format!("{}", "invalid".red())
    };
    out.push_str(&format!(
        "  Result: {} (score {}, {} error(s), {} warning(s))\n",
        verdict,
        result.score,
        result.error_count(),
        result.warning_count()
    ));
    if result.issues.is_empty() {
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Severity", "Kind", "Field", "Description", "Expected", "Actual"]);
    for issue in &result.issues {
        let severity = match issue.severity {
            Severity::Error => Cell::new("error").fg(Color::Red),
            Severity::Warning => Cell::new("warning").fg(Color::Yellow),
        };
        table.add_row(vec![
            severity,
            Cell::new(issue.kind),
            Cell::new(&issue.field),
            Cell::new(&issue.description),
            Cell::new(issue.expected.as_deref().unwrap_or("-")),
            Cell::new(issue.actual.as_deref().unwrap_or("-")),
        ]);
    }
    out.push_str(&format!("\n{}\n", table));
    out
}

pub fn format_validation_json(kind: SectionKind, result: &ValidationResult) -> String {
    let out = json!({ "section": kind, "validation": result });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
