use std::env;

use anyhow::Result;

/// Sampling and credential settings shared by every provider adapter.
///
/// Mutable only up to adapter construction; the per-provider configs take
/// ownership of one of these, substitute the provider's default model when
/// `model` is unset, and resolve the credential.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Which provider model to target; adapters fill in their documented
    /// default when unset
    pub model: Option<String>,
    /// Sampling randomness
    pub temperature: f32,
    /// Output length cap
    pub max_tokens: u32,
    /// Nucleus-sampling threshold
    pub top_p: f32,
    /// Credential override; falls back to the provider's environment variable
    pub api_key: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.0,
            max_tokens: 3000,
            top_p: 1.0,
            api_key: None,
        }
    }
}

impl ModelConfig {
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The configured model identifier, or the adapter's default
    pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.model.as_deref().unwrap_or(default)
    }
}

/// Helper to read environment variables with error handling
pub(crate) fn get_env(
    key: &str,
    required: bool,
    default: Option<String>,
) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) if !required => Ok(default),
        Err(env::VarError::NotPresent) => Err(anyhow::anyhow!(
            "Environment variable '{}' is required but not set.",
            key
        )),
        Err(e) => Err(e.into()),
    }
}
