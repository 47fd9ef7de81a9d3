//! Extension-specific error type

use thiserror::Error;

/// Error returned by an extension lifecycle hook
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// Hook failed with a plain message
    #[error("{0}")]
    Message(String),

    /// Hook failed with an arbitrary underlying error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExtensionError {
    /// Create a message-only hook error
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}
