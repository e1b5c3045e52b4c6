//! Lesson orchestrator: context, then every section in dependency order.
//!
//! One request runs sequentially on the caller's task. Each section goes
//! through its own `RegenerationController`; accepted sections fold their
//! results back into the shared context before the next section starts.

use crate::config::GenerationConfig;
use crate::error::{ApiError, LessonError, LessonErrorKind};
use crate::lesson::content::{GeneratedSection, LessonSections, SectionContent};
use crate::lesson::context::{naive_context, ContextBuild, ContextBuilder, SharedContext};
use crate::lesson::generators::generator_for;
use crate::lesson::quality::{QualityReport, QualitySectionReport};
use crate::lesson::regeneration::{AttemptState, RegenerationController, SectionResolution};
use crate::lesson::sections::{execution_order, SectionKind};
use crate::lesson::types::LessonRequest;
use crate::lesson::validation::validate_section;
use crate::provider::{classify_error, ModelProviderClient};
use crate::telemetry::{new_correlation_id, QualityMetricsSink, TracingMetricsSink};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

/// A generated lesson and the quality report describing how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonArtifact {
    pub sections: LessonSections,
    pub quality_report: QualityReport,
}

/// Why a guarded provider call did not return a response.
enum CallError {
    Cancelled,
    Provider(ApiError),
}

pub struct LessonOrchestrator {
    provider: Arc<dyn ModelProviderClient>,
    sink: Arc<dyn QualityMetricsSink>,
    config: GenerationConfig,
}

impl LessonOrchestrator {
    pub fn new(
        provider: Arc<dyn ModelProviderClient>,
        sink: Arc<dyn QualityMetricsSink>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            sink,
            config,
        }
    }

    /// Default generation settings, reports go to `tracing`.
    pub fn with_defaults(provider: Arc<dyn ModelProviderClient>) -> Self {
        Self::new(provider, Arc::new(TracingMetricsSink), GenerationConfig::default())
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate a full lesson. On any failure no partial lesson is returned.
    pub async fn generate(
        &self,
        request: &LessonRequest,
        cancel: &CancellationToken,
    ) -> Result<LessonArtifact, LessonError> {
        let correlation_id = new_correlation_id();
        let span = info_span!(
            "lesson",
            correlation_id = %correlation_id,
            level = %request.proficiency_level,
            kind = %request.lesson_kind,
            provider = %self.provider.provider_name(),
        );
        self.run(request, cancel, &correlation_id)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        request: &LessonRequest,
        cancel: &CancellationToken,
        correlation_id: &str,
    ) -> Result<LessonArtifact, LessonError> {
        let started = Instant::now();
        request.validate().map_err(|e| {
            LessonError::new(LessonErrorKind::InvalidRequest, e.to_string(), correlation_id)
        })?;
        info!(words = request.source_text.split_whitespace().count(), "Lesson generation started");

        let built = self.build_context(request, cancel, correlation_id).await?;
        let mut report = QualityReport::new(correlation_id);
        report.record_context(built.tokens_used, built.used_fallback);

        let mut context = built.context;
        let mut accepted: Vec<GeneratedSection> = Vec::new();
        let mut sections = LessonSections::default();

        for kind in execution_order() {
            let resolution = self
                .resolve_section(kind, &context, &accepted, cancel, correlation_id)
                .instrument(info_span!("section", section = %kind))
                .await?;

            context = fold_back(&context, &resolution.section);
            report.push(QualitySectionReport::from_resolution(&resolution));
            sections.insert(resolution.section.content.clone());
            accepted.push(resolution.section);
        }

        let report = report.finalize(started.elapsed().as_millis() as u64);
        info!(
            total_attempts = report.total_attempts,
            regenerations = report.total_regenerations,
            tokens = report.total_tokens,
            placeholders = report.placeholder_count(),
            duration_ms = report.duration_ms,
            "Lesson generation completed"
        );
        self.sink.record(&report);

        Ok(LessonArtifact {
            sections,
            quality_report: report,
        })
    }

    async fn build_context(
        &self,
        request: &LessonRequest,
        cancel: &CancellationToken,
        correlation_id: &str,
    ) -> Result<ContextBuild, LessonError> {
        ensure_live(cancel, correlation_id, None)?;
        let builder = ContextBuilder::new(self.provider.as_ref(), self.config.context_options());

        match self.guarded(builder.build(request), cancel).await {
            Ok(built) => {
                debug!(
                    vocabulary = built.context.key_vocabulary.len(),
                    themes = built.context.main_themes.len(),
                    fallback = built.used_fallback,
                    minimal = built.context.minimal,
                    "Shared context ready"
                );
                Ok(built)
            }
            Err(CallError::Cancelled) => Err(cancelled(correlation_id, None)),
            Err(CallError::Provider(err)) => {
                let kind = error_kind(&err);
                if matches!(kind, LessonErrorKind::QuotaExceeded | LessonErrorKind::InvalidRequest) {
                    warn!(error = %err, "Context build aborted the request");
                    return Err(LessonError::new(kind, err.to_string(), correlation_id));
                }
                warn!(error = %err, "Context extraction did not finish, using naive context");
                Ok(ContextBuild {
                    context: naive_context(request),
                    tokens_used: 0,
                    used_fallback: true,
                })
            }
        }
    }

    async fn resolve_section(
        &self,
        kind: SectionKind,
        context: &SharedContext,
        accepted: &[GeneratedSection],
        cancel: &CancellationToken,
        correlation_id: &str,
    ) -> Result<SectionResolution, LessonError> {
        let generator = generator_for(kind);
        let dependencies = kind.spec().dependencies;
        let prior: Vec<GeneratedSection> = accepted
            .iter()
            .filter(|section| dependencies.contains(&section.section))
            .cloned()
            .collect();

        let mut controller = RegenerationController::new(kind);
        while let Some(variant) = controller.next_variant() {
            ensure_live(cancel, correlation_id, Some(kind))?;

            let attempt = variant.attempt();
            let temperature = variant.temperature(self.config.temperature);
            let messages = generator.build_prompt(context, &prior, &variant).into_messages();
            let options = self.config.section_options(temperature);

            let started = Instant::now();
            let outcome = self
                .guarded(self.provider.complete(messages, options), cancel)
                .await;
            let duration_ms = started.elapsed().as_millis() as u64;

            let response = match outcome {
                Ok(response) => response,
                Err(CallError::Cancelled) => return Err(cancelled(correlation_id, Some(kind))),
                Err(CallError::Provider(err)) => {
                    let class = classify_error(&err);
                    if class.aborts_immediately() {
                        warn!(attempt, error = %err, "Provider quota exhausted, aborting lesson");
                        return Err(LessonError::new(
                            LessonErrorKind::QuotaExceeded,
                            err.to_string(),
                            correlation_id,
                        )
                        .in_section(kind));
                    }
                    warn!(attempt, class = ?class, error = %err, "Section attempt failed");
                    controller.record_failure(err, 0, duration_ms);
                    continue;
                }
            };

            let tokens_used = response.usage.total_tokens;
            let content = match generator.parse(&response.content) {
                Ok(content) => content,
                Err(err) => {
                    warn!(attempt, tokens_used, error = %err, "Section reply could not be parsed");
                    controller.record_failure(err, tokens_used, duration_ms);
                    continue;
                }
            };

            let validation = validate_section(&content, context);
            let (score, errors, warnings) = (
                validation.score,
                validation.error_count(),
                validation.warning_count(),
            );
            let state = controller.record_produced(
                GeneratedSection {
                    section: kind,
                    content,
                    tokens_used,
                    generation_strategy: generator.strategy().to_string(),
                },
                validation,
                duration_ms,
            );
            match state {
                AttemptState::Accepted(_) => {
                    info!(attempt, score, warnings, tokens_used, duration_ms, "Section accepted")
                }
                _ => warn!(
                    attempt,
                    score, errors, warnings, "Section failed validation"
                ),
            }
        }

        let resolution = controller.finish(context).map_err(|abort| {
            warn!(
                attempts = abort.attempt_count,
                kind = %abort.kind,
                "Section produced no content"
            );
            LessonError::new(abort.kind, abort.message, correlation_id).in_section(kind)
        })?;

        if resolution.placeholder {
            warn!(attempts = resolution.attempt_count, "Section replaced by placeholder");
        } else if !resolution.accepted_valid {
            warn!(
                attempts = resolution.attempt_count,
                score = resolution.validation.score,
                "Section exhausted its attempts, keeping best attempt"
            );
        }
        Ok(resolution)
    }

    /// Run a provider future under the call timeout, abandoning it on cancellation.
    async fn guarded<T, F>(&self, call: F, cancel: &CancellationToken) -> Result<T, CallError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let bounded = async {
            match self.config.call_timeout() {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => result,
                    Err(_) => Err(ApiError::ProviderTimeout(format!(
                        "no reply within {} seconds",
                        limit.as_secs()
                    ))),
                },
                None => call.await,
            }
        };
        tokio::select! {
            _ = cancel.cancelled() => Err(CallError::Cancelled),
            result = bounded => result.map_err(CallError::Provider),
        }
    }
}

fn ensure_live(
    cancel: &CancellationToken,
    correlation_id: &str,
    section: Option<SectionKind>,
) -> Result<(), LessonError> {
    if cancel.is_cancelled() {
        return Err(cancelled(correlation_id, section));
    }
    Ok(())
}

fn cancelled(correlation_id: &str, section: Option<SectionKind>) -> LessonError {
    info!("Lesson generation cancelled");
    let error = LessonError::new(
        LessonErrorKind::Cancelled,
        "Generation was cancelled",
        correlation_id,
    );
    match section {
        Some(kind) => error.in_section(kind),
        None => error,
    }
}

fn error_kind(err: &ApiError) -> LessonErrorKind {
    match err {
        ApiError::InvalidRequest(_) => LessonErrorKind::InvalidRequest,
        other => classify_error(other).lesson_error_kind(),
    }
}

/// Context after `section` is accepted.
fn fold_back(context: &SharedContext, section: &GeneratedSection) -> SharedContext {
    match &section.content {
        SectionContent::Vocabulary(vocabulary) => context.with_vocabulary(&vocabulary.terms()),
        SectionContent::Grammar(grammar) => context.with_grammar_focus(&grammar.point),
        _ => context.clone(),
    }
}
