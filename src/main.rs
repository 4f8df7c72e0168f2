//! `dotfiles` binary: parse arguments, install logging and dispatch.
use std::sync::Arc;

use clap::Parser;

use dotfiles_installer::cli::{Cli, Command};
use dotfiles_installer::commands::{self, Host};
use dotfiles_installer::logging::{self, Log, LogFile, Logger};
use dotfiles_installer::prompt;

fn main() {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if matches!(args.command, Command::Version) {
        commands::version::run();
        return;
    }

    let log_file = LogFile::new();
    logging::init_subscriber(args.verbose, &log_file);
    let log: Arc<dyn Log> = Arc::new(Logger::new(log_file.clone()));

    if let Err(e) = ctrlc::set_handler(|| {
        prompt::exit_interrupted();
    }) {
        log.debug(&format!("could not install interrupt handler: {e}"));
    }

    let code = commands::dispatch(Host::current(), &args, &log, &log_file);
    if code != 0 {
        std::process::exit(code);
    }
}
