//! Console and file logger.
use std::path::Path;

use super::subscriber::{LogFile, STAGE_TARGET};
use super::types::Log;
use crate::tasks::StepTally;

/// Implement the message methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Tracing-backed logger used by the binary.
///
/// Messages go through the global `tracing` subscriber, so they reach the
/// console and, once it is open, the run's [`LogFile`].  Component tallies
/// are echoed at debug level as they arrive.
#[derive(Debug)]
pub struct Logger {
    log_file: LogFile,
}

impl Logger {
    /// Create a logger reporting `log_file` as its persistent log.
    #[must_use]
    pub const fn new(log_file: LogFile) -> Self {
        Self { log_file }
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (console only when verbose, always in the file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a warning.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log an error.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Record a component tally.
    pub fn record_step(&self, name: &str, tally: StepTally) {
        self.debug(&format!("{name}: {tally}"));
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error);

    fn record_step(&self, name: &str, tally: StepTally) {
        self.record_step(name, tally);
    }

    fn log_file(&self) -> Option<&Path> {
        self.log_file.path()
    }
}
