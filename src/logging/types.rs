//! Core logging types: step entries and the [`Log`] trait.
use std::path::Path;

use crate::tasks::StepTally;

/// One component's contribution to the run, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEntry {
    /// Human-readable component name.
    pub name: String,
    /// Steps planned and succeeded by the component.
    pub tally: StepTally,
}

/// Reporting capability passed to every component.
///
/// [`Logger`](super::Logger) writes through `tracing` to the console and the
/// log file; `MemoryLog` keeps everything in memory for tests.
pub trait Log: Send + Sync + std::fmt::Debug {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record a component's tally.
    fn record_step(&self, name: &str, tally: StepTally);

    /// Path of the persistent log file, if this backend writes one.
    fn log_file(&self) -> Option<&Path> {
        None
    }
}
