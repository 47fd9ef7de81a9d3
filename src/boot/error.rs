//! Bootstrap-specific error types

use crate::extension::ExtensionError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Lifecycle phases an extension participates in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    BeforeStartup,
    OnStartup,
    AfterStartup,
    OnShutdown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::BeforeStartup => "BeforeStartup",
            Phase::OnStartup => "OnStartup",
            Phase::AfterStartup => "AfterStartup",
            Phase::OnShutdown => "OnShutdown",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while registering extensions or running the
/// startup/shutdown sequences
#[derive(Debug, Error)]
pub enum BootError {
    /// An extension hook failed
    #[error("extension {extension} failed during {phase}: {source}")]
    Extension {
        /// Name of the extension that failed
        extension: String,
        /// The phase whose hook failed
        phase: Phase,
        #[source]
        source: ExtensionError,
    },

    /// A whole sequence exceeded its configured deadline
    #[error("{sequence} sequence timed out after {timeout:?}")]
    Timeout {
        sequence: &'static str,
        timeout: Duration,
    },

    /// An extension of the same concrete type is already registered
    #[error("extension {0} is already registered")]
    AlreadyRegistered(String),
}

/// A specialized Result type for bootstrap operations
pub type Result<T> = std::result::Result<T, BootError>;
