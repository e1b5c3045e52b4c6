//! Workspace config file source: `lessonloom.toml` and `config/{env}.toml`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

/// Add workspace config files to builder.
/// Precedence: `<root>/lessonloom.toml` (base) then
/// `<root>/config/{LESSONLOOM_ENV}.toml` (env-specific, default "development").
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let env_name = std::env::var("LESSONLOOM_ENV").unwrap_or_else(|_| "development".to_string());
    let mut builder = builder;

    let base_config_path = workspace_root.join("lessonloom.toml");
    if base_config_path.exists() {
        builder = builder.add_source(File::from(base_config_path.as_path()).required(false));
    }

    let env_config_path = workspace_root
        .join("config")
        .join(format!("{}.toml", env_name));
    if env_config_path.exists() {
        builder = builder.add_source(File::from(env_config_path.as_path()).required(false));
    }

    Ok(builder)
}
