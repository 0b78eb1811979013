use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::message::Message;
use crate::models::tool::{Tool, ToolCall};

/// Policy controlling how the model selects among offered tools. Only sent
/// when the request carries a non-empty tool list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    #[default]
    Auto,
    Required,
    None,
}

/// Desired shape of the model output. Only the openai-compatible wire
/// protocol has a field for this; the anthropic adapter ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

/// A normalized provider reply: plain text when no tools were offered,
/// otherwise the text plus the ordered tool invocations the model requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Completion {
    Text(String),
    ToolUse(ToolUseCompletion),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUseCompletion {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

impl Completion {
    /// Get the text content of the reply regardless of variant
    pub fn text(&self) -> &str {
        match self {
            Completion::Text(text) => text,
            Completion::ToolUse(tool_use) => &tool_use.content,
        }
    }

    pub fn as_tool_use(&self) -> Option<&ToolUseCompletion> {
        match self {
            Completion::ToolUse(tool_use) => Some(tool_use),
            _ => None,
        }
    }
}

/// Base trait for LLM provider adapters (OpenAI-compatible, Anthropic, etc)
///
/// Each call is a single stateless request/response round trip: the adapter
/// shapes the conversation into the provider's wire format, issues exactly
/// one network request, and normalizes the reply into a [`Completion`].
/// Adapter-specific local validation (for example the openai-compatible
/// tool-capability pre-flight) runs before any request is made.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate the next completion for an ordered, non-empty conversation.
    ///
    /// `tools` and `tool_choice` are attached to the outgoing request only
    /// when `tools` is non-empty; providers reject empty tool lists.
    async fn generate(
        &self,
        messages: &[Message],
        response_format: Option<ResponseFormat>,
        tools: &[Tool],
        tool_choice: ToolChoice,
    ) -> Result<Completion>;
}
