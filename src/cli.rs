//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{map_error, CommandError};
pub use parse::{Cli, Commands, ConfigCommands, OutputFormat};
pub use presentation::{
    format_artifact_json, format_artifact_text, format_lesson_text, format_quality_report_text,
    format_section_heading, format_validation_json, format_validation_text,
};
pub use route::RunContext;
