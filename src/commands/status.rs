//! Status command: read-only report of link and tool state.
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::CommandSetup;
use crate::logging::Log;
use crate::resources::SymlinkResource;
use crate::tasks::Context;
use crate::tasks::editor::VIMRC;
use crate::tasks::git::GITCONFIG;
use crate::tasks::link::LinkPath;
use crate::tasks::macos::{AEROSPACE, ITERM_PROFILES};
use crate::tasks::packages::create_package_manager;
use crate::tasks::shell::ZSHRC;
use crate::tasks::terminal::KITTY_CONF;

/// State of one expected configuration link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// The target resolves to the dotfiles source.
    Linked,
    /// Something else occupies the target.
    FileExistsNotLinked,
    /// Nothing at the target.
    NotConfigured,
}

impl LinkStatus {
    /// Classify `target` against the expected `source`.
    #[must_use]
    pub fn of(source: &Path, target: &Path) -> Self {
        let link = SymlinkResource::new(source.to_path_buf(), target.to_path_buf());
        if link.resolves_to_source() {
            Self::Linked
        } else if target.exists() {
            Self::FileExistsNotLinked
        } else {
            Self::NotConfigured
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linked => f.pad("✓ Linked"),
            Self::FileExistsNotLinked => f.pad("⚠ File exists (not linked)"),
            Self::NotConfigured => f.pad("✗ Not configured"),
        }
    }
}

/// One checked link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReport {
    /// Human-readable label.
    pub label: &'static str,
    /// Absolute target path.
    pub target: PathBuf,
    /// Current state.
    pub status: LinkStatus,
}

/// One expected command-line tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolReport {
    /// Program name.
    pub name: &'static str,
    /// Whether it is on `PATH`.
    pub present: bool,
}

/// Everything the status command reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Link checks, common ones first.
    pub links: Vec<LinkReport>,
    /// Tool checks for the profile's package manager.
    pub tools: Vec<ToolReport>,
}

/// Links checked for the context's profile.
#[must_use]
pub fn checked_links(ctx: &Context) -> Vec<LinkPath> {
    let mut links = vec![ZSHRC, GITCONFIG, VIMRC, KITTY_CONF];
    if ctx.profile.is_macos() {
        links.extend([AEROSPACE, ITERM_PROFILES]);
    }
    links
}

/// Inspect every expected link and tool without changing anything.
#[must_use]
pub fn check(ctx: &Context) -> StatusReport {
    let links = checked_links(ctx)
        .into_iter()
        .map(|link| {
            let target = ctx.home_path(link.target);
            LinkReport {
                label: link.label,
                status: LinkStatus::of(&ctx.dotfile(link.source), &target),
                target,
            }
        })
        .collect();

    let runner = ctx.runner();
    let tools = create_package_manager(ctx.profile, &ctx.config)
        .expected_tools()
        .iter()
        .map(|&name| ToolReport {
            name,
            present: runner.command_exists(name),
        })
        .collect();

    StatusReport { links, tools }
}

/// Print a status report.
pub fn print_report(log: &dyn Log, report: &StatusReport) {
    log.stage("Configuration status");
    for link in &report.links {
        log.info(&format!(
            "{:<26} {:<28} {}",
            link.label,
            link.status,
            link.target.display()
        ));
    }

    log.stage("Installed tools");
    for tool in &report.tools {
        let icon = if tool.present { "✓" } else { "✗" };
        log.info(&format!("{icon} {}", tool.name));
    }
}

/// Run the status command on a completed setup.
pub fn run(setup: CommandSetup, log: Arc<dyn Log>) {
    let ctx = setup.into_context(log, false);
    print_report(&*ctx.log, &check(&ctx));
}
