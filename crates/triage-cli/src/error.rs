//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Collaborator client error
    #[error("Client error: {0}")]
    Client(#[from] triage_client::ClientError),

    /// Run failed
    #[error("{0}")]
    Run(#[from] triage_orchestrator::OrchestratorError),

    /// Input selection rejected
    #[error("{0}")]
    Input(#[from] triage_orchestrator::InputError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),

    /// Service reported itself unhealthy
    #[error("Service at {0} reported unhealthy")]
    Unhealthy(String),
}
