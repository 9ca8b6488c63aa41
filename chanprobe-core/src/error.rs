// ============================================================================
// chanprobe-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Chanprobe Core Library
//
// This module defines the error taxonomy for the stream-validation pipeline.
// Only run-level failures are represented here: a missing external tool, an
// invalid configuration, an unreadable playlist or an output that cannot be
// written. Per-channel probe and capture failures are produced as CoreError
// values by the Prober but are absorbed into channel results by the
// ChannelProcessor and never abort a run.
//
// KEY COMPONENTS:
// - CoreError: the error enum for all core operations
// - CoreResult: result alias used throughout the crate
// - Helper constructors for external command failures

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::io;
use std::process::ExitStatus;

/// Errors produced by the chanprobe core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Required dependency '{0}' not found. Please ensure it is installed and in your PATH.")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("Command '{cmd}' failed with status {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Command '{cmd}' timed out after {secs} second(s)")]
    CommandTimeout { cmd: String, secs: u64 },

    #[error("Failed to parse probe output: {0}")]
    JsonParseError(String),

    #[error("Probe returned no usable data: {0}")]
    ProbeParse(String),

    #[error("Screenshot was not produced: {0}")]
    CaptureMissing(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to write output '{path}': {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Notification error: {0}")]
    NotificationError(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a [`CoreError::CommandStart`] for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a [`CoreError::CommandFailed`] for a command that exited unsuccessfully.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Builds a [`CoreError::CommandTimeout`].
pub fn command_timeout_error(cmd: impl Into<String>, secs: u64) -> CoreError {
    CoreError::CommandTimeout {
        cmd: cmd.into(),
        secs,
    }
}

/// Wraps an I/O error raised while writing a run output.
pub fn output_write_error(path: &std::path::Path, source: io::Error) -> CoreError {
    CoreError::OutputWrite {
        path: path.display().to_string(),
        source,
    }
}

impl CoreError {
    /// Returns true for errors that mean the environment cannot run probes at all.
    #[must_use]
    pub fn is_environment_error(&self) -> bool {
        matches!(self, CoreError::DependencyNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_tools_are_environment_errors() {
        assert!(CoreError::DependencyNotFound("ffprobe".to_string()).is_environment_error());
        assert!(!CoreError::Config("jobs out of range".to_string()).is_environment_error());
        assert!(!CoreError::PathError("missing.m3u".to_string()).is_environment_error());
    }
}
