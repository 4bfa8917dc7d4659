//! Error types for the getfit_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for getfit_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No identity is available to key a profile or stats lookup
    #[error("Not signed in: no user identity available")]
    NotAuthenticated,

    /// A collaborator call failed (missing document, unreachable store, ...)
    #[error("Remote failure: {0}")]
    RemoteFailure(String),

    /// A collaborator answered with a shape we could not understand
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
