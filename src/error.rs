//! Error types for SirCLI

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`SirError`]
pub type Result<T> = std::result::Result<T, SirError>;

/// Main error type for SirCLI
#[derive(Debug, Error)]
pub enum SirError {
    /// Provider identifier that no adapter answers to
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// A chat call that could not be completed (transport, status or shape)
    #[error("{provider} API Error: {message}")]
    Provider { provider: String, message: String },

    /// No API key stored for the requested provider
    #[error("No API key found for provider: {provider}")]
    MissingApiKey { provider: String },

    /// Configuration store error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// File operation error
    #[error("{0}")]
    File(String),

    /// Shell execution error
    #[error("Shell error: {0}")]
    Shell(String),

    /// Download error
    #[error("Download failed: {0}")]
    Download(String),

    /// Search error
    #[error("Search error: {0}")]
    Search(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SirError {
    /// Build a provider failure for the given vendor display name
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
