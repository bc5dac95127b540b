//! Error types for the lynx-cli crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Graph error: {0}")]
    Graph(#[from] lynx_gremlin::GraphError),

    #[error("Config error: {0}")]
    Config(#[from] lynx_core::LynxError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
