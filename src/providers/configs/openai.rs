use anyhow::Result;

use super::base::{get_env, ModelConfig};
use crate::errors::ProviderError;

pub const OPENAI_HOST: &str = "https://api.openai.com";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Configuration for the openai-compatible adapter. The host is
/// overridable so openai-protocol gateways and local servers work too.
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: ModelConfig,
}

impl OpenAiProviderConfig {
    pub fn new(model: ModelConfig) -> Result<Self> {
        Self::with_host(OPENAI_HOST, model)
    }

    pub fn with_host<S: Into<String>>(host: S, mut model: ModelConfig) -> Result<Self> {
        let api_key = match model.api_key.clone() {
            Some(key) => key,
            None => get_env(OPENAI_API_KEY_VAR, false, None)?
                .ok_or(ProviderError::MissingCredential(OPENAI_API_KEY_VAR))?,
        };

        if model.model.is_none() {
            model.model = Some(OPENAI_DEFAULT_MODEL.to_string());
        }

        Ok(Self {
            host: host.into(),
            api_key,
            model,
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = get_env("OPENAI_HOST", false, Some(OPENAI_HOST.to_string()))?
            .unwrap_or_else(|| OPENAI_HOST.to_string());
        let model = ModelConfig {
            model: get_env("OPENAI_MODEL", false, None)?,
            ..ModelConfig::default()
        };
        Self::with_host(host, model)
    }
}
