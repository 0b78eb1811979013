use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::base::{Completion, Provider, ResponseFormat, ToolChoice};
use super::configs::openai::OPENAI_DEFAULT_MODEL;
use super::configs::OpenAiProviderConfig;
use super::utils::{
    messages_to_openai_spec, openai_response_to_completion, tools_to_openai_spec,
    validate_messages,
};
use crate::errors::ProviderError;
use crate::models::message::Message;
use crate::models::tool::Tool;

/// Chat-model families known to accept function/tool definitions. Instruct
/// and legacy completion models are not on the list and fail the pre-flight
/// check when tools are offered.
const TOOL_CALLING_MODEL_PREFIXES: &[&str] = &[
    "gpt-4o",
    "gpt-4.1",
    "gpt-4-turbo",
    "gpt-4",
    "gpt-3.5-turbo",
    "o1",
    "o3",
];

/// Whether the adapter will attach tool definitions for this model.
///
/// This is a local, static check performed before any network request.
pub fn supports_tool_calling(model: &str) -> bool {
    if model.contains("instruct") {
        return false;
    }
    TOOL_CALLING_MODEL_PREFIXES
        .iter()
        .any(|prefix| model.starts_with(prefix))
}

/// Adapter for OpenAI-protocol chat-completion endpoints. The conversation
/// is forwarded unchanged, system-role entries included; the endpoint
/// interprets the role field itself.
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(OpenAiProviderConfig::from_env()?)
    }

    async fn post(&self, payload: Value) -> Result<Value> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::OK => Ok(response.json().await?),
            _ => {
                let error_text = response.text().await.unwrap_or_default();
                warn!(%status, "openai request failed");
                Err(anyhow!("Request failed: {} - {}", status, error_text))
            }
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn generate(
        &self,
        messages: &[Message],
        response_format: Option<ResponseFormat>,
        tools: &[Tool],
        tool_choice: ToolChoice,
    ) -> Result<Completion> {
        validate_messages(messages)?;

        let model = &self.config.model;
        let model_name = model.model_or(OPENAI_DEFAULT_MODEL);

        // Pre-flight: reject tool use for models without function calling
        // before anything goes over the wire
        if !tools.is_empty() && !supports_tool_calling(model_name) {
            return Err(ProviderError::ToolCallingUnsupported(model_name.to_string()).into());
        }

        let mut payload = json!({
            "model": model_name,
            "messages": messages_to_openai_spec(messages),
            "temperature": model.temperature,
            "max_tokens": model.max_tokens,
            "top_p": model.top_p,
        });

        let body = payload.as_object_mut().unwrap();
        if let Some(format) = response_format {
            body.insert("response_format".to_string(), json!(format));
        }
        // Omitted entirely without tools; the endpoint rejects an empty list
        if !tools.is_empty() {
            body.insert("tools".to_string(), json!(tools_to_openai_spec(tools)?));
            body.insert("tool_choice".to_string(), json!(tool_choice));
        }

        debug!(
            model = model_name,
            tools = tools.len(),
            "sending openai request"
        );
        let response = self.post(payload).await?;

        openai_response_to_completion(&response, !tools.is_empty())
    }
}
