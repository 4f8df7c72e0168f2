//! Domain-specific error types for the installer.
//!
//! Internal modules return typed errors while the command handlers at the
//! CLI boundary convert them to [`anyhow::Error`] via the standard `?`
//! operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DotfilesError
//! ├── Platform(PlatformError)  unsupported host, fatal before any mutation
//! └── Config(ConfigError)      root/home resolution, dotfiles.toml parsing
//!
//! StepError                    subprocess and filesystem failures
//! ```
//!
//! Only [`DotfilesError`] ever terminates a run.  A [`StepError`] never
//! leaves the component that produced it: it is logged and folded into the
//! step tally.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the installer.
#[derive(Error, Debug)]
pub enum DotfilesError {
    /// The host platform cannot be bootstrapped.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Configuration could not be resolved or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by OS profile detection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The kernel is neither macOS nor Linux.
    #[error("unsupported operating system: {0} (only macOS and Ubuntu/Debian are supported)")]
    UnsupportedOs(String),

    /// Linux, but the release metadata names neither Ubuntu nor Debian.
    #[error("unsupported Linux distribution: {0} (only Ubuntu/Debian are supported)")]
    UnsupportedDistribution(String),
}

/// Errors raised while resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The dotfiles source tree could not be located.
    #[error("cannot determine dotfiles root; use --root or set DOTFILES_ROOT")]
    RootNotFound,

    /// The user's home directory is unknown.
    #[error("HOME environment variable is not set")]
    HomeNotSet,

    /// `dotfiles.toml` exists but could not be read.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Read {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// `dotfiles.toml` is not valid.
    #[error("Invalid TOML in {}: {message}", .path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
}

/// Non-fatal errors attached to one planned step.
#[derive(Error, Debug)]
pub enum StepError {
    /// A subprocess ran but exited unsuccessfully.
    #[error("'{command}' failed (exit {exit}): {stderr}", exit = exit_label(.code.as_ref()))]
    Subprocess {
        /// Command line that was run.
        command: String,
        /// Exit code, or `None` when killed by a signal.
        code: Option<i32>,
        /// Captured standard error (empty for interactive runs).
        stderr: String,
    },

    /// The subprocess could not be launched at all.
    #[error("failed to launch '{command}': {source}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A filesystem operation failed.
    #[error("{action} {}: {source}", .path.display())]
    Filesystem {
        /// What was being attempted (e.g. `"remove"`).
        action: &'static str,
        /// Path that was operated on.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

fn exit_label(code: Option<&i32>) -> String {
    code.map_or_else(|| "signal".to_string(), ToString::to_string)
}

impl StepError {
    /// Build a [`StepError::Filesystem`] from an I/O error.
    #[must_use]
    pub fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }
}
