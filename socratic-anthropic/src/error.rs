use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnthropicError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}
