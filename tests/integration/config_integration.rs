//! Integration tests for Configuration System

use crate::integration::test_utils::with_isolated_config;
use lessonloom::cli::RunContext;
use lessonloom::config::{ConfigLoader, LessonloomConfig, ProviderType};
use lessonloom::provider::{ModelProviderClient, ProviderFactory};
use lessonloom::ApiError;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_workspace_profile_file_overrides_base_file() {
    let global = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    std::fs::write(
        workspace.path().join("lessonloom.toml"),
        r#"
[provider]
provider_type = "ollama"
model = "llama3"

[generation]
temperature = 0.6
call_timeout_secs = 30
"#,
    )
    .unwrap();
    std::fs::create_dir_all(workspace.path().join("config")).unwrap();
    std::fs::write(
        workspace.path().join("config").join("classroom.toml"),
        "[generation]\ntemperature = 0.4\n",
    )
    .unwrap();

    let config = with_isolated_config(&global, || {
        std::env::set_var("LESSONLOOM_ENV", "classroom");
        ConfigLoader::load(workspace.path())
    })
    .unwrap();

    assert_eq!(config.provider.provider_type, ProviderType::Ollama);
    assert_eq!(config.provider.model, "llama3");
    assert!((config.generation.temperature - 0.4).abs() < f32::EPSILON);
    assert_eq!(config.generation.call_timeout(), Some(Duration::from_secs(30)));
    assert!(config.validate().is_ok());
}

#[test]
fn test_environment_overrides_explicit_file() {
    let global = TempDir::new().unwrap();
    let config_file = global.path().join("custom.toml");
    std::fs::write(&config_file, "[provider]\nmodel = \"gpt-4o\"\n").unwrap();

    let config = with_isolated_config(&global, || {
        std::env::set_var("LESSONLOOM__PROVIDER__MODEL", "gpt-4.1-mini");
        ConfigLoader::load_from_file(&config_file)
    })
    .unwrap();

    assert_eq!(config.provider.model, "gpt-4.1-mini");
}

#[test]
fn test_missing_explicit_file_is_a_config_error() {
    let global = TempDir::new().unwrap();
    let missing = global.path().join("nope.toml");

    let err = with_isolated_config(&global, || ConfigLoader::load_from_file(&missing)).unwrap_err();

    assert!(matches!(err, ApiError::ConfigError(_)));
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn test_no_files_yields_defaults() {
    let global = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    let config = with_isolated_config(&global, || ConfigLoader::load(workspace.path())).unwrap();

    assert_eq!(config.provider.provider_type, ProviderType::OpenAI);
    assert_eq!(config.provider.model, "gpt-4o-mini");
    assert_eq!(config.generation.max_tokens, 2000);
    assert_eq!(config.logging.level, LessonloomConfig::default().logging.level);
}

#[test]
fn test_invalid_values_fail_validation_with_every_problem() {
    let global = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    std::fs::write(
        workspace.path().join("lessonloom.toml"),
        r#"
[provider]
provider_type = "local"

[generation]
temperature = 3.5
"#,
    )
    .unwrap();

    let config = with_isolated_config(&global, || ConfigLoader::load(workspace.path())).unwrap();

    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    let message = config.ensure_valid().unwrap_err().to_string();
    assert!(message.contains("endpoint"));
    assert!(message.contains("Temperature"));
}

#[test]
fn test_provider_factory_builds_from_config() {
    let global = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    std::fs::write(
        workspace.path().join("lessonloom.toml"),
        "[provider]\nprovider_type = \"ollama\"\nmodel = \"mistral\"\n",
    )
    .unwrap();

    let config = with_isolated_config(&global, || ConfigLoader::load(workspace.path())).unwrap();
    let client = ProviderFactory::from_config(&config.provider).unwrap();
    assert_eq!(client.model_name(), "mistral");
}

#[test]
fn test_provider_without_key_is_not_configured() {
    let global = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    std::fs::write(
        workspace.path().join("lessonloom.toml"),
        "[provider]\nprovider_type = \"anthropic\"\nmodel = \"claude-3-5-haiku-latest\"\n",
    )
    .unwrap();

    let result = with_isolated_config(&global, || {
        ConfigLoader::load(workspace.path())
            .and_then(|config| ProviderFactory::from_config(&config.provider).map(|_| ()))
    });

    assert!(matches!(result, Err(ApiError::ProviderNotConfigured(_))));
}

#[test]
fn test_run_context_uses_global_config_file() {
    let global = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    std::fs::write(
        global.path().join("config.toml"),
        "[provider]\nmodel = \"gpt-4o\"\napi_key = \"sk-test-123\"\n",
    )
    .unwrap();

    let context = with_isolated_config(&global, || {
        RunContext::new(workspace.path().to_path_buf(), None)
    })
    .unwrap();

    assert_eq!(context.config().provider.model, "gpt-4o");
    let shown = context.config().to_redacted_toml().unwrap();
    assert!(shown.contains("gpt-4o"));
    assert!(!shown.contains("sk-test-123"));
}
