use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("No credential configured: set {0} or supply api_key in the model config")]
    MissingCredential(&'static str),

    #[error("Model '{0}' does not support tool calling")]
    ToolCallingUnsupported(String),

    #[error("At least one message is required")]
    EmptyMessages,

    #[error("Duplicate tool name: {0}")]
    DuplicateToolName(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
