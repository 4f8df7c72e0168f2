//! Top-level subcommand orchestration (`install`, `status`).
pub mod install;
pub mod status;
pub mod version;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::Config;
use crate::error::{ConfigError, DotfilesError, PlatformError};
use crate::exec::SystemExecutor;
use crate::logging::{Log, LogFile};
use crate::platform::{self, OsProfile};
use crate::prompt::TerminalPrompt;
use crate::tasks::Context;

/// Convention directories that identify a dotfiles tree.
const ROOT_MARKERS: [&str; 2] = ["zsh", "git"];

/// Exit status when setup fails.
pub const FAILURE: i32 = 1;

/// What the setup sequence reads from the machine it runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Detected profile, or why this host is unsupported.
    pub profile: Result<OsProfile, PlatformError>,
    /// `$HOME`, when set and non-empty.
    pub home: Option<PathBuf>,
}

impl Host {
    /// Inspect the running machine.
    #[must_use]
    pub fn current() -> Self {
        Self {
            profile: platform::detect(),
            home: std::env::var_os("HOME")
                .filter(|home| !home.is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Run `cli.command` on `host` and return the process exit status.
///
/// Setup runs first; only once it succeeds is `log_file` opened, so an
/// unsupported host or unresolvable configuration exits with [`FAILURE`]
/// without writing anything to disk.
pub fn dispatch(host: Host, cli: &Cli, log: &Arc<dyn Log>, log_file: &LogFile) -> i32 {
    match execute(host, cli, log, log_file) {
        Ok(code) => code,
        Err(e) => {
            log.error(&e.to_string());
            FAILURE
        }
    }
}

fn execute(host: Host, cli: &Cli, log: &Arc<dyn Log>, log_file: &LogFile) -> Result<i32> {
    if matches!(cli.command, Command::Version) {
        version::run();
        return Ok(0);
    }

    let setup = CommandSetup::init(host, &cli.global, &**log)?;
    if !log_file.open(cli.command.name()) {
        log.debug("log file unavailable, continuing without it");
    }

    Ok(match &cli.command {
        Command::Install(opts) => install::run(setup, opts, Arc::clone(log)),
        Command::Status => {
            status::run(setup, Arc::clone(log));
            0
        }
        Command::Version => 0,
    })
}

/// Shared state produced by the common command setup sequence.
///
/// Platform detection, root resolution and configuration loading happen
/// here, before any command touches the filesystem.
#[derive(Debug)]
pub struct CommandSetup {
    /// Detected OS profile.
    pub profile: OsProfile,
    /// Loaded configuration.
    pub config: Config,
    /// User's home directory.
    pub home: PathBuf,
}

impl CommandSetup {
    /// Check the host, resolve the dotfiles root and load configuration.
    ///
    /// Reads only; nothing on disk changes here.
    ///
    /// # Errors
    ///
    /// Returns [`DotfilesError::Platform`] on an unsupported host and
    /// [`DotfilesError::Config`] if the root or home directory cannot be
    /// determined or `dotfiles.toml` is invalid.
    pub fn init(host: Host, global: &GlobalOpts, log: &dyn Log) -> Result<Self, DotfilesError> {
        let profile = host.profile?;
        log.info(&format!("Detected OS: {profile}"));

        let root = resolve_root(global)?;
        let home = host.home.ok_or(ConfigError::HomeNotSet)?;
        log.debug(&format!("dotfiles root: {}", root.display()));
        log.debug(&format!("home: {}", home.display()));

        let config = Config::load(&root)?;
        let warnings = config.validate(profile);
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.section, warning.item, warning.message
                ));
            }
        }

        Ok(Self {
            profile,
            config,
            home,
        })
    }

    /// Build the run context over the real terminal and executor.
    #[must_use]
    pub fn into_context(self, log: Arc<dyn Log>, interactive: bool) -> Context {
        Context {
            config: Arc::new(self.config),
            profile: self.profile,
            log,
            prompt: Arc::new(TerminalPrompt::new(interactive)),
            executor: Arc::new(SystemExecutor),
            home: self.home,
            interactive,
        }
    }
}

/// Resolve the dotfiles root directory from CLI arguments or auto-detection.
///
/// Order: `--root`, `DOTFILES_ROOT`, the binary's location
/// (`target/release/../../..` or `bin/..`), then the current directory.
///
/// # Errors
///
/// Returns [`ConfigError::RootNotFound`] if no candidate looks like a
/// dotfiles tree.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf, ConfigError> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }

    if let Ok(root) = std::env::var("DOTFILES_ROOT") {
        return Ok(PathBuf::from(root));
    }

    let mut candidates = Vec::new();
    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        candidates.push(parent.join("../../.."));
        candidates.push(parent.join(".."));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }

    first_root(candidates).ok_or(ConfigError::RootNotFound)
}

/// The first candidate containing a convention directory, canonicalized.
fn first_root(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates
        .into_iter()
        .find(|candidate| is_dotfiles_root(candidate))
        .map(|root| dunce::canonicalize(&root).unwrap_or(root))
}

fn is_dotfiles_root(dir: &Path) -> bool {
    ROOT_MARKERS.iter().any(|marker| dir.join(marker).is_dir())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn resolve_root_uses_explicit_root() {
        let global = GlobalOpts {
            root: Some(PathBuf::from("/explicit/path")),
        };
        assert_eq!(
            resolve_root(&global).unwrap(),
            PathBuf::from("/explicit/path")
        );
    }

    #[test]
    fn resolve_root_reads_environment() {
        let _lock = crate::logging::TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous = std::env::var_os("DOTFILES_ROOT");
        // SAFETY: Protected by TEST_ENV_MUTEX; restored before the lock is released.
        #[allow(unsafe_code)]
        unsafe {
            std::env::set_var("DOTFILES_ROOT", "/from/env");
        }
        let result = resolve_root(&GlobalOpts { root: None });
        #[allow(unsafe_code)]
        unsafe {
            match previous {
                Some(value) => std::env::set_var("DOTFILES_ROOT", value),
                None => std::env::remove_var("DOTFILES_ROOT"),
            }
        }
        assert_eq!(result.unwrap(), PathBuf::from("/from/env"));
    }

    #[test]
    fn first_root_skips_directories_without_markers() {
        let empty = tempfile::tempdir().unwrap();
        let tree = tempfile::tempdir().unwrap();
        std::fs::create_dir(tree.path().join("git")).unwrap();

        let found = first_root([empty.path().to_path_buf(), tree.path().to_path_buf()]);
        assert_eq!(
            found.unwrap(),
            dunce::canonicalize(tree.path()).unwrap()
        );
    }

    #[test]
    fn first_root_requires_a_directory_marker() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zsh"), "not a directory").unwrap();
        assert!(first_root([dir.path().to_path_buf()]).is_none());
    }

    #[test]
    fn init_rejects_unsupported_host_before_resolving_anything() {
        let log = crate::logging::MemoryLog::new();
        let host = Host {
            profile: Err(PlatformError::UnsupportedOs("FreeBSD".to_string())),
            home: None,
        };
        let global = GlobalOpts {
            root: Some(PathBuf::from("/nonexistent")),
        };
        let err = CommandSetup::init(host, &global, &log).unwrap_err();
        assert!(matches!(err, DotfilesError::Platform(_)));
        assert!(log.messages().is_empty());
    }

    #[test]
    fn init_requires_home() {
        let dir = tempfile::tempdir().unwrap();
        let host = Host {
            profile: Ok(OsProfile::MacOs),
            home: None,
        };
        let global = GlobalOpts {
            root: Some(dir.path().to_path_buf()),
        };
        let err = CommandSetup::init(host, &global, &crate::logging::MemoryLog::new()).unwrap_err();
        assert!(matches!(err, DotfilesError::Config(ConfigError::HomeNotSet)));
    }

    #[test]
    fn init_loads_defaults_for_supported_host() {
        let dir = tempfile::tempdir().unwrap();
        let log = crate::logging::MemoryLog::new();
        let host = Host {
            profile: Ok(OsProfile::Ubuntu),
            home: Some(PathBuf::from("/home/me")),
        };
        let global = GlobalOpts {
            root: Some(dir.path().to_path_buf()),
        };
        let setup = CommandSetup::init(host, &global, &log).unwrap();
        assert_eq!(setup.profile, OsProfile::Ubuntu);
        assert_eq!(setup.home, PathBuf::from("/home/me"));
        assert_eq!(log.messages()[0], "Detected OS: ubuntu");
    }

    #[test]
    fn into_context_carries_setup() {
        let dir = tempfile::tempdir().unwrap();
        let setup = CommandSetup {
            profile: OsProfile::Ubuntu,
            config: Config::with_root(dir.path()),
            home: PathBuf::from("/home/me"),
        };
        let ctx = setup.into_context(Arc::new(crate::logging::MemoryLog::new()), false);
        assert_eq!(ctx.profile, OsProfile::Ubuntu);
        assert_eq!(ctx.config.root, dir.path());
        assert_eq!(ctx.home_path(".zshrc"), PathBuf::from("/home/me/.zshrc"));
        assert!(!ctx.interactive);
    }
}
