use std::io;
use thiserror::Error;

// Import module-level errors for AppError
use crate::config::settings::ConfigError;
use crate::security::validator::ValidationError;

/// Errors that can occur while executing a command
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("{0}")]
    Rejected(#[from] ValidationError),

    #[error("failed to start shell: {0}")]
    Spawn(io::Error),

    #[error("command exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("command output exceeded {0} bytes")]
    OutputOverflow(usize),
}

/// Top-level application error that wraps all module-specific errors
///
/// This provides a unified error type for application-level code while
/// preserving the specific error context from each module. All module errors
/// automatically convert to AppError via the `From` trait.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for command execution
pub type ExecResult<T> = std::result::Result<T, ExecError>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
