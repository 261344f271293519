//! Error types for session operations.

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The request carries no session identifier.
    #[error("No session identifier on request")]
    MissingSession,

    /// No store is registered under the configured cache name.
    #[error("Unknown session store: {0}")]
    UnknownStore(String),

    /// Error from the backing key-value store.
    #[error("Store error: {0}")]
    Store(String),

    /// Stored value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error from a save-and-resume persistence hook.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
