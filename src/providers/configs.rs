pub mod anthropic;
pub mod base;
pub mod openai;

pub use anthropic::AnthropicProviderConfig;
pub use base::ModelConfig;
pub use openai::OpenAiProviderConfig;

/// Unified enum to wrap the per-provider configurations
pub enum ProviderConfig {
    OpenAi(OpenAiProviderConfig),
    Anthropic(AnthropicProviderConfig),
}
