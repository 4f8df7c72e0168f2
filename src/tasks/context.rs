use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::exec::{CommandRunner, Executor};
use crate::logging::Log;
use crate::platform::OsProfile;
use crate::prompt::Prompt;

/// Shared context for one run, handed to every component.
pub struct Context {
    /// Loaded configuration, including the dotfiles root.
    pub config: Arc<Config>,
    /// Detected OS profile.
    pub profile: OsProfile,
    /// Logger for output and step recording.
    pub log: Arc<dyn Log>,
    /// Confirmation prompts and spinners.
    pub prompt: Arc<dyn Prompt>,
    /// Command executor (real or scripted).
    pub executor: Arc<dyn Executor>,
    /// User's home directory.
    pub home: PathBuf,
    /// Whether the user may be asked questions.
    pub interactive: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.config.root)
            .field("profile", &self.profile)
            .field("log", &"<dyn Log>")
            .field("prompt", &"<dyn Prompt>")
            .field("executor", &"<dyn Executor>")
            .field("home", &self.home)
            .field("interactive", &self.interactive)
            .finish()
    }
}

impl Context {
    /// `relative` inside the dotfiles tree.
    #[must_use]
    pub fn dotfile(&self, relative: &str) -> PathBuf {
        self.config.root.join(relative)
    }

    /// `relative` inside the home directory.
    #[must_use]
    pub fn home_path(&self, relative: &str) -> PathBuf {
        self.home.join(relative)
    }

    /// Command runner over this context's executor, prompt and logger.
    #[must_use]
    pub fn runner(&self) -> CommandRunner<'_> {
        CommandRunner::new(&*self.executor, &*self.prompt, &*self.log)
    }

    /// Ask a yes/no question; non-interactive runs take `default` silently.
    #[must_use]
    pub fn confirm(&self, question: &str, default: bool) -> bool {
        if self.interactive {
            self.prompt.confirm(question, default)
        } else {
            default
        }
    }
}
