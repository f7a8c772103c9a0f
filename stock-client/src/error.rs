//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Report has no lines
    #[error("Add at least one item")]
    EmptyReport,

    /// At least one report line has no item selected
    #[error("Each line needs an item")]
    MissingItemSelection,

    /// A submission from this gateway is still awaiting its response
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Backend rejected the call
    #[error("{message}")]
    Remote {
        code: Option<String>,
        message: String,
    },

    /// Network or transport failure
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Authentication required or rejected
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Form input rejected before any request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Create a remote rejection
    pub fn remote(code: Option<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code,
            message: message.into(),
        }
    }

    /// Message to show the user in a blocking alert.
    ///
    /// Remote rejections pass the backend's message through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote { message, .. } => message.clone(),
            Self::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the error was raised before any network call was made
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Self::EmptyReport
                | Self::MissingItemSelection
                | Self::SubmissionInFlight
                | Self::Validation(_)
                | Self::Config(_)
        )
    }

    /// Whether the backend (or the path to it) failed
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Remote { .. } | Self::Transport(_) | Self::Unauthorized(_)
        )
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
