//! Error types for Conduit.

pub mod category;

pub use category::ErrorCategory;

use thiserror::Error;

/// Primary error type for all Conduit operations.
#[derive(Error, Debug)]
pub enum ConduitError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote error ({operation}): {message}")]
    Remote { operation: String, message: String },

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ConduitError {
    /// Create an API error from a status code and body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a remote error for a named protocol operation.
    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Transport(_) | Self::Io(_) => ErrorCategory::Transport,
            Self::Remote { .. } | Self::ToolExecution { .. } => ErrorCategory::Remote,
            Self::Api { .. }
            | Self::Authentication(_)
            | Self::RateLimited { .. }
            | Self::Network(_)
            | Self::Serialization(_) => ErrorCategory::Backend,
            Self::InvalidArgument(_) | Self::InvalidState(_) => ErrorCategory::Internal,
        }
    }

    /// Whether this error ends the run rather than the current query.
    pub fn is_fatal(&self) -> bool {
        self.category().is_fatal()
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ConduitError>;
