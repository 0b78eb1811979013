use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::base::{Completion, Provider, ResponseFormat, ToolChoice};
use super::configs::anthropic::ANTHROPIC_DEFAULT_MODEL;
use super::configs::AnthropicProviderConfig;
use super::utils::{
    anthropic_response_to_completion, messages_to_anthropic_spec, tool_choice_to_anthropic_spec,
    tools_to_anthropic_spec, validate_messages,
};
use crate::models::message::Message;
use crate::models::tool::Tool;

pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Adapter for the Anthropic messages API. System instructions live in a
/// top-level request field rather than the conversation array, so any
/// system-role messages are split out before the request is assembled.
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicProviderConfig,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(AnthropicProviderConfig::from_env()?)
    }

    async fn post(&self, payload: Value) -> Result<Value> {
        let url = format!("{}/v1/messages", self.config.host.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::OK => Ok(response.json().await?),
            _ => {
                let error_text = response.text().await.unwrap_or_default();
                warn!(%status, "anthropic request failed");
                Err(anyhow!("Request failed: {} - {}", status, error_text))
            }
        }
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn generate(
        &self,
        messages: &[Message],
        _response_format: Option<ResponseFormat>,
        tools: &[Tool],
        tool_choice: ToolChoice,
    ) -> Result<Completion> {
        validate_messages(messages)?;

        let (system, messages_spec) = messages_to_anthropic_spec(messages);

        let model = &self.config.model;
        let mut payload = json!({
            "model": model.model_or(ANTHROPIC_DEFAULT_MODEL),
            "messages": messages_spec,
            "system": system,
            "temperature": model.temperature,
            "max_tokens": model.max_tokens,
            "top_p": model.top_p,
        });

        // The API rejects an empty tool list, so attach tools and the
        // tool-choice policy only when tools were actually offered
        if !tools.is_empty() {
            let payload = payload.as_object_mut().unwrap();
            payload.insert("tools".to_string(), json!(tools_to_anthropic_spec(tools)?));
            payload.insert(
                "tool_choice".to_string(),
                tool_choice_to_anthropic_spec(tool_choice),
            );
        }

        debug!(
            model = payload["model"].as_str().unwrap_or_default(),
            tools = tools.len(),
            "sending anthropic request"
        );
        let response = self.post(payload).await?;

        anthropic_response_to_completion(&response, !tools.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::configs::ModelConfig;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    async fn setup_mock_server(response_body: Value) -> (MockServer, AnthropicProvider) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test_api_key"))
            .and(header("anthropic-version", ANTHROPIC_API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
            .mount(&mock_server)
            .await;

        let config = AnthropicProviderConfig::with_host(
            mock_server.uri(),
            ModelConfig::default()
                .with_api_key("test_api_key")
                .with_temperature(0.7),
        )
        .unwrap();

        let provider = AnthropicProvider::new(config).unwrap();
        (mock_server, provider)
    }

    fn text_response_body() -> Value {
        json!({
            "id": "msg_123",
            "type": "message",
            "role": "assistant",
            "content": [{
                "type": "text",
                "text": "Hello! How can I assist you today?"
            }],
            "model": "claude-3-5-sonnet-20240620",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 15}
        })
    }

    #[tokio::test]
    async fn test_generate_basic() -> Result<()> {
        let (_, provider) = setup_mock_server(text_response_body()).await;

        let messages = vec![Message::user("Hello?")];
        let completion = provider
            .generate(&messages, None, &[], ToolChoice::Auto)
            .await?;

        assert_eq!(
            completion,
            Completion::Text("Hello! How can I assist you today?".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_routes_system_out_of_conversation() -> Result<()> {
        let (mock_server, provider) = setup_mock_server(text_response_body()).await;

        let messages = vec![
            Message::system("You are a helpful assistant."),
            Message::user("Hello?"),
        ];
        provider
            .generate(&messages, None, &[], ToolChoice::Auto)
            .await?;

        let requests = mock_server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body)?;

        assert_eq!(body["system"], "You are a helpful assistant.");
        let forwarded = body["messages"].as_array().unwrap();
        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded[0]["role"], "user");
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_omits_tools_when_none_offered() -> Result<()> {
        let (mock_server, provider) = setup_mock_server(text_response_body()).await;

        let messages = vec![Message::user("Hello?")];
        provider
            .generate(&messages, None, &[], ToolChoice::Auto)
            .await?;

        let requests = mock_server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body)?;

        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());

        // Sampling parameters are always forwarded from configuration
        let temperature = body["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
        assert_eq!(body["max_tokens"], 3000);
        assert_eq!(body["top_p"], 1.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_tool_use() -> Result<()> {
        let response_body = json!({
            "id": "msg_tool",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Let me check."},
                {
                    "type": "tool_use",
                    "id": "toolu_1",
                    "name": "get_weather",
                    "input": {"city": "Paris"}
                }
            ],
            "model": "claude-3-5-sonnet-20240620",
            "stop_reason": "tool_use"
        });
        let (mock_server, provider) = setup_mock_server(response_body).await;

        let tool = Tool::new(
            "get_weather",
            "Gets the current weather for a city",
            json!({
                "type": "object",
                "properties": {"city": {"type": "string"}},
                "required": ["city"]
            }),
        );
        let messages = vec![Message::user("What's the weather in Paris?")];

        let completion = provider
            .generate(&messages, None, &[tool], ToolChoice::Auto)
            .await?;

        let tool_use = completion.as_tool_use().unwrap();
        assert_eq!(tool_use.content, "Let me check.");
        assert_eq!(tool_use.tool_calls.len(), 1);
        assert_eq!(tool_use.tool_calls[0].name, "get_weather");
        assert_eq!(tool_use.tool_calls[0].arguments, json!({"city": "Paris"}));

        // The request must carry both the tool list and the policy
        let requests = mock_server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body)?;
        assert_eq!(body["tools"][0]["name"], "get_weather");
        assert_eq!(body["tool_choice"], json!({"type": "auto"}));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_empty_messages_fails_locally() -> Result<()> {
        let (mock_server, provider) = setup_mock_server(text_response_body()).await;

        let result = provider.generate(&[], None, &[], ToolChoice::Auto).await;
        assert!(result.is_err());

        let requests: Vec<Request> = mock_server.received_requests().await.unwrap();
        assert!(requests.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_provider_error_propagates() -> Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "type": "error",
                "error": {"type": "authentication_error", "message": "invalid x-api-key"}
            })))
            .mount(&mock_server)
            .await;

        let config = AnthropicProviderConfig::with_host(
            mock_server.uri(),
            ModelConfig::default().with_api_key("bad_key"),
        )?;
        let provider = AnthropicProvider::new(config)?;

        let result = provider
            .generate(&[Message::user("Hello?")], None, &[], ToolChoice::Auto)
            .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("401"));
        Ok(())
    }
}
