//! Confirmation prompts and progress indicators.
//!
//! Components never talk to the terminal directly: they ask the injected
//! [`Prompt`] for a yes/no answer or a spinner.  [`TerminalPrompt`] backs the
//! real binary; `ScriptedPrompt` (feature `test-support`) replays canned
//! answers and records every question so callers can assert on what was (or
//! was not) asked.
#[cfg(any(test, feature = "test-support"))]
use std::collections::VecDeque;
#[cfg(any(test, feature = "test-support"))]
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use inquire::InquireError;

/// User-interaction capability passed to every component.
pub trait Prompt: Send + Sync + std::fmt::Debug {
    /// Ask a yes/no question.  Non-interactive implementations answer
    /// `default` without asking.
    fn confirm(&self, question: &str, default: bool) -> bool;

    /// Start an indeterminate progress indicator labelled `label`.
    ///
    /// The caller finishes it with [`ProgressBar::finish_and_clear`].
    fn spinner(&self, label: &str) -> ProgressBar;
}

/// Exit status after an interrupt (128 + SIGINT).
pub const INTERRUPTED: i32 = 130;

/// Abandon the run after Ctrl-C: clear the current line, warn and exit with
/// [`INTERRUPTED`].
pub fn exit_interrupted() -> ! {
    print!("\r\x1b[2K");
    tracing::warn!("Interrupted");
    std::process::exit(INTERRUPTED);
}

/// Terminal-backed prompt using `inquire` and `indicatif`.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompt {
    interactive: bool,
}

impl TerminalPrompt {
    /// Create a prompt; when `interactive` is `false` every confirmation
    /// resolves to its default answer.
    #[must_use]
    pub const fn new(interactive: bool) -> Self {
        Self { interactive }
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, question: &str, default: bool) -> bool {
        if !self.interactive {
            return default;
        }
        let result = inquire::Confirm::new(question)
            .with_default(default)
            .prompt();
        match answer_of(result, default) {
            Some(answer) => answer,
            None => exit_interrupted(),
        }
    }

    fn spinner(&self, label: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(label.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Map a prompt result onto an answer.
///
/// Escape declines; an unusable terminal falls back to `default`.  `None`
/// means the user pressed Ctrl-C and the run must stop.
fn answer_of(result: Result<bool, InquireError>, default: bool) -> Option<bool> {
    match result {
        Ok(answer) => Some(answer),
        Err(InquireError::OperationCanceled) => Some(false),
        Err(InquireError::OperationInterrupted) => None,
        Err(e) => {
            tracing::debug!("prompt unavailable ({e}), assuming default");
            Some(default)
        }
    }
}

/// Prompt that replays scripted answers.
///
/// Answers are consumed in FIFO order; once exhausted every further question
/// receives `fallback`.  Spinners are hidden.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    fallback: bool,
    asked: Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-support"))]
impl ScriptedPrompt {
    /// Answer every question with `answer`.
    #[must_use]
    pub fn always(answer: bool) -> Self {
        Self::with_answers(Vec::new(), answer)
    }

    /// Answer with `answers` in order, then `fallback`.
    #[must_use]
    pub fn with_answers(answers: Vec<bool>, fallback: bool) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            fallback,
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Every question asked so far, in order.
    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .map_or_else(|_| Vec::new(), |guard| guard.clone())
    }

    /// Number of questions asked so far.
    #[must_use]
    pub fn prompt_count(&self) -> usize {
        self.asked.lock().map_or(0, |guard| guard.len())
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Prompt for ScriptedPrompt {
    fn confirm(&self, question: &str, _default: bool) -> bool {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(question.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or(self.fallback)
    }

    fn spinner(&self, _label: &str) -> ProgressBar {
        ProgressBar::hidden()
    }
}
