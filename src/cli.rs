//! Command-line surface.
use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotfiles installer.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "Idempotent workstation bootstrapper for macOS and Ubuntu",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Override dotfiles root directory
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install packages and link configuration files
    Install(InstallOpts),
    /// Show which configuration files are linked and which tools are present
    Status,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Status => "status",
            Self::Version => "version",
        }
    }
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct InstallOpts {
    /// Skip package installation
    #[arg(long)]
    pub skip_packages: bool,

    /// Skip shell configuration
    #[arg(long)]
    pub skip_shell: bool,

    /// Skip macOS system preferences
    #[arg(long)]
    pub skip_system: bool,

    /// Never prompt; take every default answer
    #[arg(long = "no-interactive", action = clap::ArgAction::SetFalse)]
    pub interactive: bool,

    /// Exit with status 1 when any step had issues
    #[arg(long)]
    pub strict: bool,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn install_opts(args: &[&str]) -> InstallOpts {
        let cli = Cli::parse_from(args);
        match cli.command {
            Command::Install(opts) => opts,
            other => panic!("expected install, got {other:?}"),
        }
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn install_defaults() {
        let opts = install_opts(&["dotfiles", "install"]);
        assert!(!opts.skip_packages);
        assert!(!opts.skip_shell);
        assert!(!opts.skip_system);
        assert!(opts.interactive, "interactive should be true by default");
        assert!(!opts.strict);
    }

    #[test]
    fn install_skip_flags() {
        let opts = install_opts(&[
            "dotfiles",
            "install",
            "--skip-packages",
            "--skip-shell",
            "--skip-system",
        ]);
        assert!(opts.skip_packages && opts.skip_shell && opts.skip_system);
    }

    #[test]
    fn no_interactive_disables_prompts() {
        let opts = install_opts(&["dotfiles", "install", "--no-interactive"]);
        assert!(!opts.interactive);
    }

    #[test]
    fn strict_flag() {
        assert!(install_opts(&["dotfiles", "install", "--strict"]).strict);
    }

    #[test]
    fn parse_status() {
        let cli = Cli::parse_from(["dotfiles", "status"]);
        assert!(matches!(cli.command, Command::Status));
        assert_eq!(cli.command.name(), "status");
    }

    #[test]
    fn status_rejects_install_flags() {
        assert!(Cli::try_parse_from(["dotfiles", "status", "--skip-shell"]).is_err());
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["dotfiles", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["dotfiles", "install", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_root_override() {
        let cli = Cli::parse_from(["dotfiles", "--root", "/tmp/dotfiles", "status"]);
        assert_eq!(
            cli.global.root,
            Some(std::path::PathBuf::from("/tmp/dotfiles"))
        );
    }
}
