//! In-memory [`Log`] implementation.
use std::sync::Mutex;

use super::types::{Log, StepEntry};
use crate::tasks::StepTally;

/// Severity of a captured message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Stage header.
    Stage,
    /// Informational.
    Info,
    /// Debug detail.
    Debug,
    /// Warning.
    Warn,
    /// Error.
    Error,
}

/// Implement the message methods of [`Log`] by capturing them at a level.
macro_rules! capture_log_methods {
    ($($method:ident => $level:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.push(Level::$level, msg);
            }
        )+
    };
}

/// Logger that captures messages and step tallies instead of printing.
///
/// Used wherever output must be inspected afterwards, most notably by the
/// test suites of the components and the orchestrator.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<(Level, String)>>,
    steps: Mutex<Vec<StepEntry>>,
}

impl MemoryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: Level, msg: &str) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push((level, msg.to_string()));
        }
    }

    /// Every captured message with its level.
    #[must_use]
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().map_or_else(|_| Vec::new(), |g| g.clone())
    }

    /// Every captured message text, regardless of level.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|(_, msg)| msg).collect()
    }

    fn at(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg)
            .collect()
    }

    /// Captured error messages.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.at(Level::Error)
    }

    /// Captured warnings.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.at(Level::Warn)
    }

    /// Recorded component tallies, in order.
    #[must_use]
    pub fn steps(&self) -> Vec<StepEntry> {
        self.steps.lock().map_or_else(|_| Vec::new(), |g| g.clone())
    }
}

impl Log for MemoryLog {
    capture_log_methods!(
        stage => Stage,
        info => Info,
        debug => Debug,
        warn => Warn,
        error => Error,
    );

    fn record_step(&self, name: &str, tally: StepTally) {
        if let Ok(mut guard) = self.steps.lock() {
            guard.push(StepEntry {
                name: name.to_string(),
                tally,
            });
        }
    }
}
