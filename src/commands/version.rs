//! Command: print version information.

/// Version stamped by the build script, or the crate version.
#[must_use]
pub fn current() -> &'static str {
    option_env!("DOTFILES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the installer version to stdout.
pub fn run() {
    println!("dotfiles {}", current());
}
