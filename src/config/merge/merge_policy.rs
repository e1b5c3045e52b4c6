//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources win key by key; tables merge rather than replace, so a
//! workspace file that only sets `generation.max_tokens` keeps every other
//! generation default.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("provider.provider_type", "openai")?
        .set_default("provider.model", "gpt-4o-mini")?
        .set_default("generation.temperature", 0.7)?
        .set_default("generation.max_tokens", 2000)?
        .set_default("generation.context_max_tokens", 800)?
        .set_default("generation.call_timeout_secs", 120)?
        .set_default("logging.level", "info")
}
