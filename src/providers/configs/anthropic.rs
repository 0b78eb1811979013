use anyhow::Result;

use super::base::{get_env, ModelConfig};
use crate::errors::ProviderError;

pub const ANTHROPIC_HOST: &str = "https://api.anthropic.com";
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";
pub const ANTHROPIC_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Configuration for the anthropic adapter, fully resolved at construction:
/// the credential must be available (explicit or from the environment) and
/// the default model is substituted when none was supplied.
pub struct AnthropicProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: ModelConfig,
}

impl AnthropicProviderConfig {
    pub fn new(model: ModelConfig) -> Result<Self> {
        Self::with_host(ANTHROPIC_HOST, model)
    }

    pub fn with_host<S: Into<String>>(host: S, mut model: ModelConfig) -> Result<Self> {
        let api_key = match model.api_key.clone() {
            Some(key) => key,
            None => get_env(ANTHROPIC_API_KEY_VAR, false, None)?
                .ok_or(ProviderError::MissingCredential(ANTHROPIC_API_KEY_VAR))?,
        };

        if model.model.is_none() {
            model.model = Some(ANTHROPIC_DEFAULT_MODEL.to_string());
        }

        Ok(Self {
            host: host.into(),
            api_key,
            model,
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = get_env("ANTHROPIC_HOST", false, Some(ANTHROPIC_HOST.to_string()))?
            .unwrap_or_else(|| ANTHROPIC_HOST.to_string());
        let model = ModelConfig {
            model: get_env("ANTHROPIC_MODEL", false, None)?,
            ..ModelConfig::default()
        };
        Self::with_host(host, model)
    }
}
