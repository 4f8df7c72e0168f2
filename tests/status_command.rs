#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for the `status` command.

mod common;

use common::WorkstationBuilder;
use dotfiles_installer::commands::install::InstallOptions;
use dotfiles_installer::commands::status::{self, LinkStatus};
use dotfiles_installer::exec::FakeExecutor;
use dotfiles_installer::platform::OsProfile;

#[test]
fn status_after_install_reports_every_link() {
    let ws = WorkstationBuilder::new().full_tree().build();
    ws.install(OsProfile::MacOs, false, &InstallOptions::default());
    let commands_after_install = ws.executor.commands().len();

    let report = status::check(&ws.context(OsProfile::MacOs, false));
    assert_eq!(report.links.len(), 6);
    assert!(
        report.links.iter().all(|l| l.status == LinkStatus::Linked),
        "{:?}",
        report.links
    );
    assert_eq!(ws.executor.commands().len(), commands_after_install);
}

#[test]
fn status_distinguishes_foreign_files() {
    let ws = WorkstationBuilder::new().full_tree().build();
    ws.write_home(".vimrc", "syntax on\n");

    let report = status::check(&ws.context(OsProfile::Ubuntu, false));
    let statuses: Vec<_> = report.links.iter().map(|l| (l.label, l.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("Zsh configuration", LinkStatus::NotConfigured),
            ("Git configuration", LinkStatus::NotConfigured),
            ("Vim configuration", LinkStatus::FileExistsNotLinked),
            ("Kitty configuration", LinkStatus::NotConfigured),
        ]
    );
}

#[test]
fn status_checks_profile_tools() {
    let ws = WorkstationBuilder::new()
        .executor(FakeExecutor::new().with_programs(&["brew", "git", "zsh"]))
        .build();
    let report = status::check(&ws.context(OsProfile::MacOs, false));
    let missing: Vec<_> = report
        .tools
        .iter()
        .filter(|t| !t.present)
        .map(|t| t.name)
        .collect();
    assert_eq!(missing, vec!["vim"]);
}
