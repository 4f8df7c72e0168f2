//! Component installers and the step accounting that ties them together.
//!
//! Every installer implements [`Component`] and reports a [`StepTally`];
//! [`execute`] runs one component under a stage header and records its
//! tally with the logger.
mod context;
pub mod editor;
pub mod git;
pub mod link;
pub mod macos;
pub mod packages;
pub mod shell;
mod tally;
pub mod terminal;

pub use context::Context;
pub use tally::{StepKind, StepTally};

/// A unit of installation work.
pub trait Component {
    /// Human-readable component name, used for stage headers and the plan.
    fn name(&self) -> &str;

    /// One-line description shown in the installation plan.
    fn description(&self) -> String;

    /// Perform the component's steps.
    ///
    /// Never fails: every problem is logged and reflected in the tally.
    fn run(&self, ctx: &Context) -> StepTally;
}

/// Run a component under a stage header, recording its tally.
pub fn execute(component: &dyn Component, ctx: &Context) -> StepTally {
    ctx.log.stage(component.name());
    let tally = component.run(ctx);
    ctx.log.record_step(component.name(), tally);
    tally
}

/// Shared helpers for component unit tests.
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub mod test_helpers {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use crate::config::Config;
    use crate::exec::FakeExecutor;
    use crate::logging::MemoryLog;
    use crate::platform::OsProfile;
    use crate::prompt::ScriptedPrompt;

    use super::Context;

    /// A temporary dotfiles tree and home directory with scripted I/O.
    #[derive(Debug)]
    pub struct TestEnv {
        /// Keeps the directories alive.
        pub dir: tempfile::TempDir,
        /// Dotfiles root.
        pub root: PathBuf,
        /// Home directory.
        pub home: PathBuf,
        /// Captured log.
        pub log: Arc<MemoryLog>,
        /// Scripted prompt (answers "yes" once the script runs out).
        pub prompt: Arc<ScriptedPrompt>,
        /// Recording executor.
        pub executor: Arc<FakeExecutor>,
    }

    impl TestEnv {
        /// Empty tree where every question is answered "yes".
        #[must_use]
        pub fn new() -> Self {
            Self::with_answers(Vec::new())
        }

        /// Empty tree answering `answers` in order, then "yes".
        #[must_use]
        pub fn with_answers(answers: Vec<bool>) -> Self {
            Self::build(answers, FakeExecutor::new())
        }

        /// Empty tree using `executor`.
        #[must_use]
        pub fn with_executor(executor: FakeExecutor) -> Self {
            Self::build(Vec::new(), executor)
        }

        fn build(answers: Vec<bool>, executor: FakeExecutor) -> Self {
            let dir = tempfile::tempdir().expect("temp dir");
            let root = dir.path().join("dotfiles");
            let home = dir.path().join("home");
            std::fs::create_dir_all(&root).unwrap();
            std::fs::create_dir_all(&home).unwrap();
            Self {
                dir,
                root,
                home,
                log: Arc::new(MemoryLog::new()),
                prompt: Arc::new(ScriptedPrompt::with_answers(answers, true)),
                executor: Arc::new(executor),
            }
        }

        /// Write `relative` inside the dotfiles tree and return its path.
        pub fn write_dotfile(&self, relative: &str, contents: &str) -> PathBuf {
            let path = self.root.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, contents).unwrap();
            path
        }

        /// Create a directory `relative` inside the home directory.
        pub fn mkdir_home(&self, relative: &str) -> PathBuf {
            let path = self.home.join(relative);
            std::fs::create_dir_all(&path).unwrap();
            path
        }

        /// Context for the macOS profile.
        #[must_use]
        pub fn context(&self, interactive: bool) -> Context {
            self.context_for(OsProfile::MacOs, interactive)
        }

        /// Context for `profile`.
        #[must_use]
        pub fn context_for(&self, profile: OsProfile, interactive: bool) -> Context {
            Context {
                config: Arc::new(Config::with_root(&self.root)),
                profile,
                log: Arc::clone(&self.log) as Arc<dyn crate::logging::Log>,
                prompt: Arc::clone(&self.prompt) as Arc<dyn crate::prompt::Prompt>,
                executor: Arc::clone(&self.executor) as Arc<dyn crate::exec::Executor>,
                home: self.home.clone(),
                interactive,
            }
        }

        /// Whether `relative` under home is a symlink to `source`.
        #[must_use]
        pub fn is_linked(&self, relative: &str, source: &Path) -> bool {
            std::fs::read_link(self.home.join(relative)).is_ok_and(|dest| dest == source)
        }
    }
}
