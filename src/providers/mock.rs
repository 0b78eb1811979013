use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;

use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::{Completion, Provider, ResponseFormat, ToolChoice};

/// A mock provider that returns pre-configured completions for testing
pub struct MockProvider {
    completions: Arc<Mutex<Vec<Completion>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of completions
    pub fn new(completions: Vec<Completion>) -> Self {
        Self {
            completions: Arc::new(Mutex::new(completions)),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn generate(
        &self,
        _messages: &[Message],
        _response_format: Option<ResponseFormat>,
        _tools: &[Tool],
        _tool_choice: ToolChoice,
    ) -> Result<Completion> {
        let mut completions = self.completions.lock().unwrap();
        if completions.is_empty() {
            // Return an empty text completion if no more are configured
            Ok(Completion::Text(String::new()))
        } else {
            Ok(completions.remove(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_drains_in_order() -> Result<()> {
        let provider: Box<dyn Provider> = Box::new(MockProvider::new(vec![
            Completion::Text("first".to_string()),
            Completion::Text("second".to_string()),
        ]));

        let messages = [Message::user("hi")];
        let first = provider
            .generate(&messages, None, &[], ToolChoice::Auto)
            .await?;
        let second = provider
            .generate(&messages, None, &[], ToolChoice::Auto)
            .await?;
        let drained = provider
            .generate(&messages, None, &[], ToolChoice::Auto)
            .await?;

        assert_eq!(first.text(), "first");
        assert_eq!(second.text(), "second");
        assert_eq!(drained.text(), "");
        Ok(())
    }
}
