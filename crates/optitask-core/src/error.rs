//! Core error types for optitask-core.
//!
//! Command rejections ([`TimerError`]) are local and recoverable: the engine
//! returns them without touching its state. Persistence failures surface
//! through the notification sink and never reach the engine.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::{RunState, SessionPhase};

/// Core error type for optitask-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected timer command
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Time-entry persistence errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The timer service task is gone
    #[error("Timer service has shut down")]
    ServiceClosed,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A timer command was not valid in the current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A work phase cannot run without a task to attribute it to.
    #[error("No task selected for {phase} phase")]
    NoTaskSelected { phase: SessionPhase },

    /// The command is not allowed in the current run state.
    #[error("Cannot {command} while {state}")]
    InvalidTransition {
        command: &'static str,
        state: RunState,
    },
}

/// Errors talking to the time-entry service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Service answered with a non-success status
    #[error("API request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    /// Request never completed
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Store is missing required settings (base URL, user id)
    #[error("Time-entry store not configured: {0}")]
    NotConfigured(String),

    /// Entry refused before reaching the service
    #[error("Time entry rejected: {0}")]
    Rejected(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No usable configuration directory
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PersistenceError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            PersistenceError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            PersistenceError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for PersistenceError {
    fn from(err: url::ParseError) -> Self {
        PersistenceError::NotConfigured(format!("invalid base URL: {err}"))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_error_messages_name_state() {
        let err = TimerError::InvalidTransition {
            command: "stop",
            state: RunState::Idle,
        };
        assert_eq!(err.to_string(), "Cannot stop while idle");

        let err = TimerError::NoTaskSelected {
            phase: SessionPhase::Work,
        };
        assert_eq!(err.to_string(), "No task selected for work phase");
    }

    #[test]
    fn core_error_wraps_timer_error() {
        let err: CoreError = TimerError::NoTaskSelected {
            phase: SessionPhase::Work,
        }
        .into();
        assert!(matches!(err, CoreError::Timer(_)));
    }
}
