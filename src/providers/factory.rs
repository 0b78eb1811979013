use anyhow::Result;
use strum_macros::EnumIter;

use super::{
    anthropic::AnthropicProvider, base::Provider, configs::ProviderConfig, openai::OpenAiProvider,
};

#[derive(EnumIter, Debug)]
pub enum ProviderType {
    OpenAi,
    Anthropic,
}

pub fn get_provider(config: ProviderConfig) -> Result<Box<dyn Provider + Send + Sync>> {
    match config {
        ProviderConfig::OpenAi(openai_config) => Ok(Box::new(OpenAiProvider::new(openai_config)?)),
        ProviderConfig::Anthropic(anthropic_config) => {
            Ok(Box::new(AnthropicProvider::new(anthropic_config)?))
        }
    }
}
