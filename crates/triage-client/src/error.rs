//! Error types for collaborator calls.

use thiserror::Error;

/// Collaborator call errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure before a response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success response from an extraction endpoint
    #[error("Server error (HTTP {status}): {body}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// Response body did not parse as expected
    #[error("Decode error: {0}")]
    Decode(String),

    /// Artifact could not be turned into a request
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    /// Client could not be built from the configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Body text of a server error, if this is one
    pub fn server_body(&self) -> Option<&str> {
        match self {
            ClientError::Server { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else if e.is_builder() {
            ClientError::Config(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(format!("JSON parsing error: {}", e))
    }
}
