use std::collections::HashSet;

use anyhow::Result;
use regex::Regex;
use serde_json::{json, Value};

use super::base::{Completion, ToolChoice, ToolUseCompletion};
use crate::errors::{ProviderError, ProviderResult};
use crate::models::message::{Message, Role};
use crate::models::tool::{Tool, ToolCall};

/// Reject empty conversations before any request is assembled
pub fn validate_messages(messages: &[Message]) -> ProviderResult<()> {
    if messages.is_empty() {
        return Err(ProviderError::EmptyMessages);
    }
    Ok(())
}

/// Convert the internal conversation to OpenAI's chat message specification.
/// All roles are forwarded as-is; the endpoint interprets the role field.
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            json!({
                "role": message.role,
                "content": message.content,
            })
        })
        .collect()
}

/// Convert the conversation for providers that model system instructions
/// outside the message array: system-role entries at any position are
/// collected into the returned system string (joined in order) and excluded
/// from the returned conversation.
pub fn messages_to_anthropic_spec(messages: &[Message]) -> (String, Vec<Value>) {
    let mut system = String::new();
    let mut converted = Vec::new();

    for message in messages {
        match message.role {
            Role::System => {
                if !system.is_empty() {
                    system.push_str("\n\n");
                }
                system.push_str(&message.content);
            }
            role => converted.push(json!({
                "role": role,
                "content": message.content,
            })),
        }
    }

    (system, converted)
}

/// Convert internal Tool format to OpenAI's API tool specification
pub fn tools_to_openai_spec(tools: &[Tool]) -> ProviderResult<Vec<Value>> {
    let mut tool_names = HashSet::new();
    let mut result = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(ProviderError::DuplicateToolName(tool.name.clone()));
        }

        result.push(json!({
            "type": "function",
            "function": {
                "name": sanitize_function_name(&tool.name),
                "description": tool.description,
                "parameters": tool.parameters,
            }
        }));
    }

    Ok(result)
}

/// Convert internal Tool format to Anthropic's API tool specification
pub fn tools_to_anthropic_spec(tools: &[Tool]) -> ProviderResult<Vec<Value>> {
    let mut tool_names = HashSet::new();
    let mut result = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(ProviderError::DuplicateToolName(tool.name.clone()));
        }

        result.push(json!({
            "name": sanitize_function_name(&tool.name),
            "description": tool.description,
            "input_schema": tool.parameters,
        }));
    }

    Ok(result)
}

/// Anthropic expects the tool-choice policy as a tagged object; "required"
/// is spelled "any" on that wire
pub fn tool_choice_to_anthropic_spec(tool_choice: ToolChoice) -> Value {
    match tool_choice {
        ToolChoice::Auto => json!({"type": "auto"}),
        ToolChoice::Required => json!({"type": "any"}),
        ToolChoice::None => json!({"type": "none"}),
    }
}

/// Normalize an OpenAI chat-completion response.
///
/// With tools offered, the reply is the extracted text plus every returned
/// tool call with its serialized argument string parsed into a JSON mapping;
/// without tools, the reply is just the text content.
pub fn openai_response_to_completion(response: &Value, tools_offered: bool) -> Result<Completion> {
    let message = response
        .pointer("/choices/0/message")
        .ok_or_else(|| ProviderError::MalformedResponse("missing choices[0].message".into()))?;

    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    if !tools_offered {
        return Ok(Completion::Text(content));
    }

    let mut tool_calls = Vec::new();
    if let Some(calls) = message.get("tool_calls").and_then(|v| v.as_array()) {
        for call in calls {
            let name = call
                .pointer("/function/name")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    ProviderError::MalformedResponse("tool call without a function name".into())
                })?;

            if !is_valid_function_name(name) {
                return Err(ProviderError::MalformedResponse(format!(
                    "function name '{}' had invalid characters, it must match [a-zA-Z0-9_-]+",
                    name
                ))
                .into());
            }

            let arguments = call
                .pointer("/function/arguments")
                .and_then(|v| v.as_str())
                .unwrap_or("{}");
            let arguments: Value = serde_json::from_str(arguments).map_err(|e| {
                ProviderError::MalformedResponse(format!(
                    "could not parse arguments for '{}': {}",
                    name, e
                ))
            })?;

            tool_calls.push(ToolCall::new(name, arguments));
        }
    }

    Ok(Completion::ToolUse(ToolUseCompletion {
        content,
        tool_calls,
    }))
}

/// Normalize an Anthropic messages response. Text blocks join in order;
/// tool_use blocks carry their input already structured, taken as-is.
pub fn anthropic_response_to_completion(
    response: &Value,
    tools_offered: bool,
) -> Result<Completion> {
    let blocks = response
        .get("content")
        .and_then(|v| v.as_array())
        .ok_or_else(|| ProviderError::MalformedResponse("missing content array".into()))?;

    let mut content = String::new();
    let mut tool_calls = Vec::new();

    for block in blocks {
        match block.get("type").and_then(|v| v.as_str()) {
            Some("text") => {
                if let Some(text) = block.get("text").and_then(|v| v.as_str()) {
                    content.push_str(text);
                }
            }
            Some("tool_use") => {
                let name = block.get("name").and_then(|v| v.as_str()).ok_or_else(|| {
                    ProviderError::MalformedResponse("tool_use block without a name".into())
                })?;
                let input = block.get("input").cloned().unwrap_or_else(|| json!({}));
                tool_calls.push(ToolCall::new(name, input));
            }
            _ => {}
        }
    }

    if tools_offered {
        Ok(Completion::ToolUse(ToolUseCompletion {
            content,
            tool_calls,
        }))
    } else {
        Ok(Completion::Text(content))
    }
}

pub fn sanitize_function_name(name: &str) -> String {
    let re = Regex::new(r"[^a-zA-Z0-9_-]").unwrap();
    re.replace_all(name, "_").to_string()
}

fn is_valid_function_name(name: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
    re.is_match(name)
}
