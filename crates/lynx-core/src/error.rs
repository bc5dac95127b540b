use thiserror::Error;

/// Top-level error type for the Lynx platform.
#[derive(Error, Debug)]
pub enum LynxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
