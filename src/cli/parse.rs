//! CLI parse: clap types for lessonloom. No behavior; definitions only.

use crate::lesson::{LessonKind, ProficiencyLevel};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// lessonloom - quality-gated lesson generation from source text
#[derive(Parser, Debug)]
#[command(name = "lessonloom")]
#[command(about = "Generate graded language lessons from a source text")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root used to find lessonloom.toml
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable logging (default: off)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a complete lesson from a source text
    Generate {
        /// Source text file; reads stdin when omitted or "-"
        source: Option<PathBuf>,

        /// Learner level (A1, A2, B1, B2, C1)
        #[arg(long, short = 'l', default_value = "B1")]
        level: ProficiencyLevel,

        /// Lesson kind (discussion, grammar, travel, business, pronunciation)
        #[arg(long, short = 'k', default_value = "discussion")]
        kind: LessonKind,

        /// Language the lesson is written in
        #[arg(long, default_value = "English")]
        language: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also write the full lesson JSON to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Validate one section JSON file offline, without calling a provider
    Validate {
        /// Section key (warmup, vocabulary, dialogue_practice, ...)
        section: String,

        /// File holding the section JSON
        file: PathBuf,

        #[arg(long, short = 'l', default_value = "B1")]
        level: ProficiencyLevel,

        #[arg(long, short = 'k', default_value = "discussion")]
        kind: LessonKind,

        #[arg(long, default_value = "English")]
        language: String,

        /// Source text the section was generated from
        #[arg(long)]
        source: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Check the effective configuration
    Validate,
}

impl Commands {
    /// Dotted command name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Generate { .. } => "generate",
            Commands::Validate { .. } => "validate",
            Commands::Config {
                command: ConfigCommands::Show,
            } => "config.show",
            Commands::Config {
                command: ConfigCommands::Validate,
            } => "config.validate",
        }
    }
}
