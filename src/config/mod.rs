pub mod types;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use std::path::Path;
pub use types::*;

/// Prefix for structured environment overrides, e.g. `PROMPT_BRIDGE_UPSTREAM__TIMEOUT_MS`
const ENV_PREFIX: &str = "PROMPT_BRIDGE";

/// Load configuration from defaults, an optional TOML file and the environment.
///
/// The flat variables understood by earlier deployments (`PROMOT_SHARE_API_URL`,
/// `API_KEY`, `USER_TOKEN`, `REQUEST_TIMEOUT`, `DEBUG`) take precedence over
/// everything else.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let timeout = non_empty_var("REQUEST_TIMEOUT").and_then(|raw| request_timeout(&raw));
    let debug = std::env::var("DEBUG")
        .map(|v| v == "true")
        .unwrap_or(false);

    builder = builder
        .set_override_option("upstream.base_url", non_empty_var("PROMOT_SHARE_API_URL"))?
        .set_override_option("upstream.api_key", non_empty_var("API_KEY"))?
        .set_override_option("upstream.user_token", non_empty_var("USER_TOKEN"))?
        .set_override_option("upstream.timeout_ms", timeout)?
        .set_override_option("logging.level", debug.then(|| "debug".to_string()))?;

    let config = builder.build().with_context(|| match path {
        Some(path) => format!("Failed to load config from: {}", path.display()),
        None => "Failed to load config from environment".to_string(),
    })?;

    let app_config: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    validate_config(&app_config)?;

    Ok(app_config)
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Leading digits of `REQUEST_TIMEOUT` in milliseconds. Anything without them,
/// or zero, leaves the default in place.
fn request_timeout(raw: &str) -> Option<i64> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse::<i64>().ok().filter(|ms| *ms > 0)
}

/// Validate the loaded configuration
pub fn validate_config(config: &AppConfig) -> Result<()> {
    reqwest::Url::parse(&config.upstream.base_url).with_context(|| {
        format!(
            "Invalid upstream base URL '{}'",
            config.upstream.base_url
        )
    })?;

    if config.upstream.timeout_ms == 0 {
        anyhow::bail!("Request timeout must be a positive number of milliseconds");
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        anyhow::bail!(
            "Invalid log level '{}'. Valid levels: {}",
            config.logging.level,
            valid_levels.join(", ")
        );
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        anyhow::bail!(
            "Invalid log format '{}'. Valid formats: {}",
            config.logging.format,
            valid_formats.join(", ")
        );
    }

    Ok(())
}
