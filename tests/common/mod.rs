// Shared helpers for integration tests.
//
// Provides a temporary dotfiles tree plus home directory and a fluent
// builder, so each integration test can drive the orchestrator through the
// public API with scripted prompts and a recording executor.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dotfiles_installer::commands::install::{InstallOptions, InstallReport, Orchestrator};
use dotfiles_installer::config::Config;
use dotfiles_installer::exec::{Executor, FakeExecutor};
use dotfiles_installer::logging::{Log, MemoryLog};
use dotfiles_installer::platform::OsProfile;
use dotfiles_installer::prompt::{Prompt, ScriptedPrompt};
use dotfiles_installer::tasks::Context;
use dotfiles_installer::tasks::macos::{MacOsExtras, NoExtras, PlatformExtras};

/// Every file the installers link, relative to the dotfiles root.
pub const DOTFILES: &[&str] = &[
    "zsh/.zshrc",
    "zsh/.zsh_plugins",
    "zsh/.p10k.zsh",
    "zsh/aliases.zsh",
    "iterm/steeef-lambda.zsh-theme",
    "iterm/iterm-profiles.json",
    "git/.gitconfig",
    "vim/.vimrc",
    "kitty/kitty.conf",
    "kitty/kitty-customizations",
    "aerospace/.aerospace.toml",
    "ubersicht/aerospace-mode.jsx",
    "ubersicht/simple-bar/simplebarrc",
    "brew/Brewfile.devtools",
];

/// An isolated dotfiles tree and home directory backed by a
/// [`tempfile::TempDir`].
pub struct Workstation {
    /// Keeps the directories alive.
    pub dir: tempfile::TempDir,
    /// Dotfiles root.
    pub root: PathBuf,
    /// Home directory.
    pub home: PathBuf,
    /// Captured log.
    pub log: Arc<MemoryLog>,
    /// Scripted prompt.
    pub prompt: Arc<ScriptedPrompt>,
    /// Recording executor.
    pub executor: Arc<FakeExecutor>,
}

impl Workstation {
    /// Context for `profile`.
    pub fn context(&self, profile: OsProfile, interactive: bool) -> Context {
        Context {
            config: Arc::new(Config::load(&self.root).expect("load config")),
            profile,
            log: Arc::clone(&self.log) as Arc<dyn Log>,
            prompt: Arc::clone(&self.prompt) as Arc<dyn Prompt>,
            executor: Arc::clone(&self.executor) as Arc<dyn Executor>,
            home: self.home.clone(),
            interactive,
        }
    }

    /// Extras for `profile`, looking for apps inside the temp directory.
    pub fn extras(&self, profile: OsProfile) -> Box<dyn PlatformExtras> {
        match profile {
            OsProfile::MacOs => Box::new(MacOsExtras::with_applications_dir(
                self.dir.path().join("Applications"),
            )),
            OsProfile::Ubuntu => Box::new(NoExtras),
        }
    }

    /// Run a full install.
    pub fn install(
        &self,
        profile: OsProfile,
        interactive: bool,
        options: &InstallOptions,
    ) -> InstallReport {
        let ctx = self.context(profile, interactive);
        let extras = self.extras(profile);
        Orchestrator::with_extras(&ctx, options, extras.as_ref()).run()
    }

    /// Source path of `relative` inside the dotfiles tree.
    pub fn dotfile(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Where `relative` under home points, if it is a symlink.
    pub fn link_target(&self, relative: &str) -> Option<PathBuf> {
        std::fs::read_link(self.home.join(relative)).ok()
    }

    /// Whether `home_relative` is a symlink to `dotfile_relative`.
    pub fn is_linked(&self, home_relative: &str, dotfile_relative: &str) -> bool {
        self.link_target(home_relative).as_deref() == Some(self.dotfile(dotfile_relative).as_path())
    }

    /// Write `contents` to `relative` under home.
    pub fn write_home(&self, relative: &str, contents: &str) -> PathBuf {
        write(&self.home, relative, contents)
    }

    /// Questions asked that offered to replace an existing file.
    pub fn replace_prompts(&self) -> usize {
        self.prompt
            .asked()
            .iter()
            .filter(|q| q.contains("Replace it?"))
            .count()
    }
}

/// Fluent builder for [`Workstation`].
pub struct WorkstationBuilder {
    files: Vec<&'static str>,
    answers: Vec<bool>,
    fallback: bool,
    executor: FakeExecutor,
}

impl WorkstationBuilder {
    /// An empty tree where every question is answered "yes".
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            answers: Vec::new(),
            fallback: true,
            executor: FakeExecutor::new(),
        }
    }

    /// Populate every convention file from [`DOTFILES`].
    pub fn full_tree(mut self) -> Self {
        self.files.extend_from_slice(DOTFILES);
        self
    }

    /// Answer questions with `answers` in order before the fallback.
    pub fn answers(mut self, answers: Vec<bool>) -> Self {
        self.answers = answers;
        self
    }

    /// Answer every unscripted question with `fallback`.
    pub fn fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Use `executor` instead of an always-succeeding one.
    pub fn executor(mut self, executor: FakeExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Create the directories and files.
    pub fn build(self) -> Workstation {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path().join("dotfiles");
        let home = dir.path().join("home");
        std::fs::create_dir_all(&root).expect("create root");
        std::fs::create_dir_all(&home).expect("create home");
        for file in &self.files {
            write(&root, file, &format!("# {file}\n"));
        }
        Workstation {
            dir,
            root,
            home,
            log: Arc::new(MemoryLog::new()),
            prompt: Arc::new(ScriptedPrompt::with_answers(self.answers, self.fallback)),
            executor: Arc::new(self.executor),
        }
    }
}

fn write(base: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = base.join(relative);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
    std::fs::write(&path, contents).expect("write file");
    path
}
