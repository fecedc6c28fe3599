//! Error types for interp-platform

use std::time::Duration;

/// Errors reported by a [`ProcessService`](crate::ProcessService).
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Command not found: {command}")]
    NotFound { command: String },

    #[error("Failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with status {code:?}: {stderr}")]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{command} timed out after {timeout:?}")]
    TimedOut { command: String, timeout: Duration },
}

impl ProcessError {
    /// The command the failure refers to.
    pub fn command(&self) -> &str {
        match self {
            Self::NotFound { command }
            | Self::Spawn { command, .. }
            | Self::NonZeroExit { command, .. }
            | Self::TimedOut { command, .. } => command,
        }
    }
}

/// Errors reported by a [`RegistryBackend`](crate::RegistryBackend).
///
/// These never reach callers of [`RegistryReader`](crate::RegistryReader);
/// the reader logs them and answers with an empty result instead.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Registry key not found: {key}")]
    KeyNotFound { key: String },

    #[error("Registry backend failed for {key}: {message}")]
    Backend { key: String, message: String },

    #[error("Registry is not available on this platform")]
    Unavailable,
}

impl RegistryError {
    pub fn backend(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            key: key.into(),
            message: message.into(),
        }
    }
}
