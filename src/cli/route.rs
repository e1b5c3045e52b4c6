//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::output::CommandError;
use crate::cli::parse::{Commands, ConfigCommands, OutputFormat};
use crate::cli::presentation::{
    format_artifact_json, format_artifact_text, format_quality_report_text,
    format_validation_json, format_validation_text,
};
use crate::config::{ConfigLoader, LessonloomConfig};
use crate::error::ApiError;
use crate::lesson::context::naive_context;
use crate::lesson::generators::parse_section;
use crate::lesson::{
    validate_section, LessonKind, LessonOrchestrator, LessonRequest, ProficiencyLevel, SectionKind,
};
use crate::provider::{ModelProviderClient, ProviderFactory};
use crate::telemetry::TracingMetricsSink;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace and loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: LessonloomConfig,
}

impl RunContext {
    /// Load configuration from an explicit file or from the workspace layers.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref cfg_path) => ConfigLoader::load_from_file(cfg_path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn from_config(workspace_root: PathBuf, config: LessonloomConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn config(&self) -> &LessonloomConfig {
        &self.config
    }

    /// Execute one command and return what should be printed on stdout.
    pub async fn execute(
        &self,
        command: &Commands,
        cancel: &CancellationToken,
    ) -> Result<String, CommandError> {
        let started = Instant::now();
        debug!(command = command.name(), workspace = %self.workspace_root.display(), "Executing command");
        let result = match command {
            Commands::Generate {
                source,
                level,
                kind,
                language,
                format,
                output,
            } => {
                let provider: Arc<dyn ModelProviderClient> =
                    Arc::from(ProviderFactory::from_config(&self.config.provider)?);
                let source_text = read_source(source.as_deref()).await?;
                let request = LessonRequest::new(source_text, *kind, *level, language.clone());
                self.generate(provider, &request, *format, output.as_deref(), cancel)
                    .await
            }
            Commands::Validate {
                section,
                file,
                level,
                kind,
                language,
                source,
                format,
            } => self.validate(section, file, *level, *kind, language, source.as_deref(), *format),
            Commands::Config {
                command: ConfigCommands::Show,
            } => Ok(self.config.to_redacted_toml()?),
            Commands::Config {
                command: ConfigCommands::Validate,
            } => {
                self.config.ensure_valid()?;
                Ok("Configuration is valid.".to_string())
            }
        };
        info!(
            command = command.name(),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    /// Generate with an explicit provider; `execute` builds one from config.
    pub async fn generate(
        &self,
        provider: Arc<dyn ModelProviderClient>,
        request: &LessonRequest,
        format: OutputFormat,
        output: Option<&Path>,
        cancel: &CancellationToken,
    ) -> Result<String, CommandError> {
        self.config.ensure_valid()?;
        let orchestrator = LessonOrchestrator::new(
            provider,
            Arc::new(TracingMetricsSink),
            self.config.generation.clone(),
        );
        let artifact = orchestrator.generate(request, cancel).await?;

        let json = format_artifact_json(&artifact)?;
        if let Some(path) = output {
            tokio::fs::write(path, &json)
                .await
                .map_err(|e| CommandError::io(format!("Failed to write {}", path.display()), e))?;
        }
        Ok(match (format, output) {
            (OutputFormat::Json, _) => json,
            (OutputFormat::Text, Some(path)) => format!(
                "{}\n  Lesson written to {}\n",
                format_quality_report_text(&artifact.quality_report),
                path.display()
            ),
            (OutputFormat::Text, None) => format_artifact_text(&artifact),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn validate(
        &self,
        section: &str,
        file: &Path,
        level: ProficiencyLevel,
        kind: LessonKind,
        language: &str,
        source: Option<&Path>,
        format: OutputFormat,
    ) -> Result<String, CommandError> {
        let section_kind = SectionKind::from_key(section).ok_or_else(|| {
            ApiError::InvalidRequest(format!(
                "Unknown section '{}' (expected one of: {})",
                section,
                SectionKind::ALL.map(|k| k.key()).join(", ")
            ))
        })?;
        let raw = std::fs::read_to_string(file)
            .map_err(|e| CommandError::io(format!("Failed to read {}", file.display()), e))?;
        let content = parse_section(section_kind, &raw)?;

        // Without a source the section text itself seeds the context.
        let source_text = match source {
            Some(path) => std::fs::read_to_string(path)
                .map_err(|e| CommandError::io(format!("Failed to read {}", path.display()), e))?,
            None => raw,
        };
        let context = naive_context(&LessonRequest::new(source_text, kind, level, language));
        let result = validate_section(&content, &context);

        Ok(match format {
            OutputFormat::Text => format_validation_text(section_kind, &result),
            OutputFormat::Json => format_validation_json(section_kind, &result),
        })
    }
}

/// Read the source text from a file, or from stdin for `None` / "-".
async fn read_source(path: Option<&Path>) -> Result<String, CommandError> {
    match path {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CommandError::io(format!("Failed to read {}", path.display()), e)),
        _ => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(|e| CommandError::io("Failed to read stdin", e))?;
            Ok(text)
        }
    }
}
