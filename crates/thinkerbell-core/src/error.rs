//! Error types for the Thinkerbell engine

/// Result type alias using Thinkerbell's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for engine operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Scorer execution errors
    #[error("scorer error: {0}")]
    Scorer(String),

    /// Remote scoring provider errors (recovered by local fallback)
    #[error("provider error: {0}")]
    Provider(String),

    /// Configuration errors (fatal at startup)
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote provider deadline exceeded (recovered by local fallback)
    #[error("operation timed out")]
    Timeout,
}

impl Error {
    /// Create a new scorer error
    pub fn scorer(msg: impl Into<String>) -> Self {
        Self::Scorer(msg.into())
    }

    /// Create a new provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
