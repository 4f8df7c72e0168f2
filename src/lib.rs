//! Workstation bootstrapper.
//!
//! Detects the host OS, installs packages through the native package
//! manager and links configuration files from a dotfiles tree into the
//! home directory.  Every run converges: re-running it is safe.
//!
//! The public API is organised into layers:
//!
//! - **[`platform`]** detects the OS profile
//! - **[`exec`]** runs external commands, captured or interactive
//! - **[`resources`]** provides idempotent `check + apply` primitives
//! - **[`tasks`]** holds the component installers and step accounting
//! - **[`commands`]** orchestrates `install` and `status`
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod prompt;
pub mod resources;
pub mod tasks;
