//! Error types for vocards.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocardsError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("OPENAI_API_KEY is missing: add it to your shell environment")]
    MissingApiKey,

    // Startup input errors
    #[error("Vocabulary file not found at {path}")]
    InputNotFound { path: String },

    #[error("Prompt file not found at {path}")]
    PromptNotFound { path: String },

    // Remote service errors
    #[error("{service} request failed: {message}")]
    Http { service: String, message: String },

    #[error("{service} error: {message}")]
    Service { service: String, message: String },

    #[error("Unusable completion: {message}")]
    Decode { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl VocardsError {
    /// Builds an [`VocardsError::Http`] from a transport-level reqwest failure.
    pub fn http(service: &str, error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            format!("timed out: {error}")
        } else {
            error.to_string()
        };
        VocardsError::Http {
            service: service.to_string(),
            message,
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VocardsError>;
