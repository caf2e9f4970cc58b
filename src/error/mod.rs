mod context;
mod exit_codes;
mod format;

pub use context::ErrorContext;
pub use exit_codes::get_exit_code;
pub use format::{format_error_chain, format_error_with_color};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModeSwitchError {
    #[error("Restart already in progress.")]
    AlreadyPending,

    #[error("Cannot test while restart is pending.")]
    SwitchInProgress,

    #[error("A UI test is already running.")]
    TestInProgress,

    #[error("Agent not ready.")]
    NotReady,

    #[error("Invalid mode '{0}'")]
    InvalidMode(String),

    #[error("UI update failed: {0}")]
    Presentation(String),

    #[error("Failed to clear trigger signal at {path}")]
    SignalClear {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start countdown: {0}")]
    CountdownSpawn(#[source] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ModeSwitchError {
    /// Whether this error is a request rejection rather than a fault.
    ///
    /// Rejections are answered to the caller as a status line and never
    /// change coordinator state.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ModeSwitchError::AlreadyPending
                | ModeSwitchError::SwitchInProgress
                | ModeSwitchError::TestInProgress
                | ModeSwitchError::NotReady
        )
    }
}

impl From<config::ConfigError> for ModeSwitchError {
    fn from(error: config::ConfigError) -> Self {
        ModeSwitchError::ConfigError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ModeSwitchError>;
