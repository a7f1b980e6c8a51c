//! Error handling for the lifbox CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Runtime layer error
    #[error("Runtime error: {0}")]
    Runtime(#[from] lifbox_runtime::RuntimeError),

    /// Tensor layer error
    #[error("Math error: {0}")]
    Math(#[from] lifbox_runtime::MathError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parameter file parse error
    #[error("Parameter file error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Parameter serialization error
    #[error("Parameter serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("Error: {0}")]
    Generic(#[from] anyhow::Error),

    /// Invalid command arguments
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }
}
