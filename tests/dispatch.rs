#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for command dispatch: setup runs first and a failed
//! setup exits 1 without writing anything.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use dotfiles_installer::cli::Cli;
use dotfiles_installer::commands::{self, FAILURE, Host};
use dotfiles_installer::error::PlatformError;
use dotfiles_installer::logging::{Log, LogFile, MemoryLog};
use dotfiles_installer::platform::OsProfile;

struct Machine {
    _dir: tempfile::TempDir,
    root: PathBuf,
    home: PathBuf,
    cache: PathBuf,
}

impl Machine {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("dotfiles");
        let home = dir.path().join("home");
        std::fs::create_dir_all(root.join("zsh")).unwrap();
        std::fs::write(root.join("zsh/.zshrc"), "# zshrc\n").unwrap();
        std::fs::create_dir_all(&home).unwrap();
        Self {
            cache: dir.path().join("cache"),
            _dir: dir,
            root,
            home,
        }
    }

    fn cli(&self, command: &str) -> Cli {
        let root = self.root.to_string_lossy().into_owned();
        Cli::try_parse_from(["dotfiles", "--root", root.as_str(), command]).unwrap()
    }

    fn dispatch(&self, host: Host, command: &str) -> (i32, Arc<MemoryLog>) {
        let log = Arc::new(MemoryLog::new());
        let shared = Arc::clone(&log) as Arc<dyn Log>;
        let code = commands::dispatch(
            host,
            &self.cli(command),
            &shared,
            &LogFile::in_dir(&self.cache),
        );
        (code, log)
    }

    fn home_is_untouched(&self) -> bool {
        std::fs::read_dir(&self.home).unwrap().next().is_none()
    }
}

fn fedora(home: &Path) -> Host {
    Host {
        profile: Err(PlatformError::UnsupportedDistribution("fedora".to_string())),
        home: Some(home.to_path_buf()),
    }
}

#[test]
fn unsupported_host_fails_before_any_mutation() {
    let machine = Machine::new();
    for command in ["install", "status"] {
        let (code, log) = machine.dispatch(fedora(&machine.home), command);
        assert_eq!(code, FAILURE, "{command}");
        assert_eq!(log.errors().len(), 1);
        assert!(
            log.errors()[0].starts_with("unsupported Linux distribution: fedora"),
            "{:?}",
            log.errors()
        );
        assert!(!machine.cache.exists(), "{command} wrote a log file");
        assert!(machine.home_is_untouched(), "{command} touched home");
    }
}

#[test]
fn unsupported_os_is_reported_the_same_way() {
    let machine = Machine::new();
    let host = Host {
        profile: Err(PlatformError::UnsupportedOs("FreeBSD".to_string())),
        home: Some(machine.home.clone()),
    };
    let (code, log) = machine.dispatch(host, "install");
    assert_eq!(code, FAILURE);
    assert!(log.errors()[0].contains("FreeBSD"));
    assert!(!machine.cache.exists());
}

#[test]
fn missing_home_fails_without_log_file() {
    let machine = Machine::new();
    let host = Host {
        profile: Ok(OsProfile::Ubuntu),
        home: None,
    };
    let (code, log) = machine.dispatch(host, "status");
    assert_eq!(code, FAILURE);
    assert!(log.errors()[0].contains("HOME"), "{:?}", log.errors());
    assert!(!machine.cache.exists());
}

#[test]
fn successful_setup_opens_log_file_with_early_messages() {
    let machine = Machine::new();
    let host = Host {
        profile: Ok(OsProfile::Ubuntu),
        home: Some(machine.home.clone()),
    };
    let (code, log) = machine.dispatch(host, "status");
    assert_eq!(code, 0);
    assert!(log.errors().is_empty(), "{:?}", log.errors());
    assert!(log.messages().contains(&"Detected OS: ubuntu".to_string()));
    assert!(machine.cache.join("status.log").is_file());
    assert!(machine.home_is_untouched(), "status is read-only");
}
