use thiserror::Error;

/// Top-level error type for the Dealflow system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for
/// DealflowError` so the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DealflowError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DealflowError {
    fn from(e: serde_json::Error) -> Self {
        DealflowError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for DealflowError {
    fn from(e: toml::de::Error) -> Self {
        DealflowError::Config(e.to_string())
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, DealflowError>;
