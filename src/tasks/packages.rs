//! Package manager strategies, one per OS profile.
use std::fmt;
use std::path::PathBuf;

use super::{Component, Context, StepTally};
use crate::config::{AptConfig, Config, HomebrewConfig};
use crate::exec::{CommandRunner, Invocation};
use crate::platform::OsProfile;

/// Homebrew's official bootstrap script.
const HOMEBREW_INSTALL: &str = r#"/bin/bash -c "$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)""#;

/// Installs the toolset for one OS profile.
pub trait PackageManagerStrategy: fmt::Debug {
    /// Display name for the plan and status output.
    fn name(&self) -> &'static str;

    /// Tools the status command expects on `PATH` for this profile.
    fn expected_tools(&self) -> &'static [&'static str];

    /// Install everything.  Returns `true` when every required step
    /// succeeded.
    fn install(&self, runner: &CommandRunner<'_>) -> bool;
}

/// Select the strategy for `profile`.
#[must_use]
pub fn create_package_manager(
    profile: OsProfile,
    config: &Config,
) -> Box<dyn PackageManagerStrategy> {
    match profile {
        OsProfile::MacOs => Box::new(Homebrew::new(config.root.clone(), config.homebrew.clone())),
        OsProfile::Ubuntu => Box::new(Apt::new(config.apt.clone())),
    }
}

/// Homebrew plus bundle manifests.
#[derive(Debug, Clone)]
pub struct Homebrew {
    root: PathBuf,
    config: HomebrewConfig,
}

impl Homebrew {
    /// Strategy applying `config`'s manifests from the dotfiles `root`.
    #[must_use]
    pub const fn new(root: PathBuf, config: HomebrewConfig) -> Self {
        Self { root, config }
    }
}

impl PackageManagerStrategy for Homebrew {
    fn name(&self) -> &'static str {
        "Homebrew"
    }

    fn expected_tools(&self) -> &'static [&'static str] {
        &["brew", "git", "zsh", "vim"]
    }

    fn install(&self, runner: &CommandRunner<'_>) -> bool {
        let log = runner.log();
        let mut success = true;

        if runner.command_exists("brew") {
            log.info("✓ Homebrew already installed");
        } else {
            success &= runner.run(
                &Invocation::interactive(HOMEBREW_INSTALL)
                    .described("Installing Homebrew (may require password)..."),
            );
        }

        success &=
            runner.run(&Invocation::captured("brew update").described("Updating Homebrew..."));

        for manifest in &self.config.manifests {
            let path = self.root.join(&manifest.file);
            if !path.exists() {
                log.warn(&format!(
                    "{} not found, skipping {}",
                    manifest.file.display(),
                    manifest.description
                ));
                continue;
            }
            let command = format!("brew bundle --file='{}'", path.display());
            let label = format!("Installing {} (may require password)...", manifest.description);
            success &= runner.run(
                &Invocation::interactive(&command)
                    .described(&label)
                    .in_dir(&self.root),
            );
        }

        if let Some(optional) = &self.config.optional_manifest
            && self.root.join(optional).exists()
        {
            log.info(&format!(
                "Optional packages available in {}",
                optional.display()
            ));
            log.info(&format!("Run: brew bundle --file={}", optional.display()));
        }

        success
    }
}

/// APT with a fixed core list and best-effort extras.
#[derive(Debug, Clone)]
pub struct Apt {
    config: AptConfig,
}

impl Apt {
    /// Strategy installing `config`'s packages.
    #[must_use]
    pub const fn new(config: AptConfig) -> Self {
        Self { config }
    }
}

impl PackageManagerStrategy for Apt {
    fn name(&self) -> &'static str {
        "APT (Ubuntu/Debian)"
    }

    fn expected_tools(&self) -> &'static [&'static str] {
        &["git", "zsh", "vim", "apt"]
    }

    fn install(&self, runner: &CommandRunner<'_>) -> bool {
        let mut success = runner.run(
            &Invocation::interactive("sudo apt update")
                .described("Updating package lists (may require password)..."),
        );

        let install = format!("sudo apt install -y {}", self.config.packages.join(" "));
        success &= runner.run(
            &Invocation::interactive(&install)
                .described("Installing core packages (may require password)..."),
        );

        for package in &self.config.optional {
            let command = format!("sudo apt install -y {package}");
            let label = format!("Installing {package}...");
            runner.run_best_effort(&Invocation::interactive(&command).described(&label));
        }

        runner
            .log()
            .info("Note: Some macOS-specific apps (AeroSpace, Übersicht) are not available on Linux");

        success
    }
}

/// The package installation step: one planned step whatever the strategy
/// does internally.
#[derive(Debug)]
pub struct InstallPackages {
    strategy: Box<dyn PackageManagerStrategy>,
}

impl InstallPackages {
    /// Component running `strategy`.
    #[must_use]
    pub fn new(strategy: Box<dyn PackageManagerStrategy>) -> Self {
        Self { strategy }
    }
}

impl Component for InstallPackages {
    fn name(&self) -> &str {
        "Packages"
    }

    fn description(&self) -> String {
        format!("{} and development tools", self.strategy.name())
    }

    fn run(&self, ctx: &Context) -> StepTally {
        StepTally::single(self.strategy.install(&ctx.runner()))
    }
}
