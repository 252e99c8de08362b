//! Layered settings: defaults, optional TOML file, environment.

use crate::{DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL, FallbackPolicy, RelayConfig};
use config::{Config, Environment, File};
use derive_getters::Getters;
use relay_core::{ApiKey, LogFormat, OutputFormat, SafetyThresholds};
use relay_error::ConfigError;
use relay_models::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, GeminiClientConfig};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tracing::debug;

/// Address the HTTP host binds when none is configured.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8888";

const ENV_PREFIX: &str = "RELAY";
const API_KEY_VAR: &str = "GEMINI_API_KEY";
const DEFAULT_CONFIG_NAME: &str = "relay";

/// Relay settings.
///
/// Sources, lowest precedence first:
/// 1. built-in defaults
/// 2. a TOML file (`relay.toml` in the working directory if present, or an explicit path)
/// 3. `RELAY_*` environment variables, e.g. `RELAY_OUTPUT_FORMAT=json`
/// 4. `GEMINI_API_KEY` for the credential
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct RelaySettings {
    /// Socket address for the HTTP host
    bind_address: String,
    /// Model tried first
    primary_model: String,
    /// Model tried when the primary fails
    fallback_model: String,
    /// Upper bound on model invocations per request
    max_attempts: usize,
    /// `text` (default) or `json`
    output_format: OutputFormat,
    /// Per-call timeout for the generation API
    request_timeout_secs: u64,
    /// Generation API root
    base_url: String,
    /// `pretty` or `json` log lines
    log_format: LogFormat,
    /// Credential; blank values count as absent
    #[serde(default, deserialize_with = "deserialize_api_key")]
    api_key: Option<ApiKey>,
}

fn deserialize_api_key<'de, D>(deserializer: D) -> Result<Option<ApiKey>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(ApiKey::new))
}

#[track_caller]
fn settings_error(e: config::ConfigError) -> ConfigError {
    ConfigError::new(format!("Failed to load settings: {}", e))
}

impl RelaySettings {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any value has the
    /// wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Loads settings, reading environment variables from `env` when given
    /// instead of the process environment.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let api_key = match &env {
            Some(vars) => vars.get(API_KEY_VAR).cloned(),
            None => std::env::var(API_KEY_VAR).ok(),
        };

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let mut builder = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)
            .and_then(|b| b.set_default("primary_model", DEFAULT_PRIMARY_MODEL))
            .and_then(|b| b.set_default("fallback_model", DEFAULT_FALLBACK_MODEL))
            .and_then(|b| b.set_default("max_attempts", 2))
            .and_then(|b| b.set_default("output_format", OutputFormat::default().to_string()))
            .and_then(|b| b.set_default("request_timeout_secs", DEFAULT_TIMEOUT_SECS))
            .and_then(|b| b.set_default("base_url", DEFAULT_BASE_URL))
            .and_then(|b| b.set_default("log_format", LogFormat::default().to_string()))
            .map_err(settings_error)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            );

        if let Some(key) = api_key {
            builder = builder.set_override("api_key", key).map_err(settings_error)?;
        }

        let settings: Self = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(settings_error)?;

        debug!(
            primary_model = %settings.primary_model,
            fallback_model = %settings.fallback_model,
            output_format = %settings.output_format,
            api_key_present = settings.api_key.is_some(),
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Checks values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank primary model, zero attempts, or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary_model.trim().is_empty() {
            return Err(ConfigError::new("primary_model must not be empty"));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::new("max_attempts must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::new("request_timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Relay configuration derived from these settings.
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig::new(
            self.api_key.clone(),
            FallbackPolicy::new(
                vec![self.primary_model.clone(), self.fallback_model.clone()],
                self.max_attempts,
            ),
            self.output_format,
            SafetyThresholds::permissive(),
        )
    }

    /// Gemini client configuration derived from these settings.
    pub fn client_config(&self) -> GeminiClientConfig {
        GeminiClientConfig::new(self.base_url.clone(), self.request_timeout_secs)
    }
}
