//! Custom error types for sentry-release.
//!
//! Configuration problems reported by the validator are deliberately not part
//! of this enum: they are collected into a
//! [`ValidationReport`](crate::validator::ValidationReport) and end the run
//! cleanly. Everything here is fatal and aborts the remaining steps.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for sentry-release operations.
#[derive(Error, Debug)]
pub enum SentryReleaseError {
    // External command errors
    #[error(
        "{label} failed: `{command_line}` exited with {}",
        display_exit_code(.exit_code)
    )]
    Execution {
        label: String,
        command_line: String,
        exit_code: Option<i32>,
    },

    #[error("{label} failed: unable to run `{command_line}`: {source}")]
    Spawn {
        label: String,
        command_line: String,
        #[source]
        source: std::io::Error,
    },

    #[error("sentry-cli was not found at {} after installation", .0.display())]
    ToolMissing(PathBuf),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unable to determine home directory: HOME is not set")]
    HomeNotFound,

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    // Repository errors
    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using SentryReleaseError
pub type Result<T> = std::result::Result<T, SentryReleaseError>;

fn display_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".into(),
    }
}

impl SentryReleaseError {
    /// Create an execution error for a step that exited unsuccessfully
    pub fn execution(
        label: impl Into<String>,
        command_line: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::Execution {
            label: label.into(),
            command_line: command_line.into(),
            exit_code,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// True for failures raised while running an external command.
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, Self::Execution { .. } | Self::Spawn { .. })
    }
}
