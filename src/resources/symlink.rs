//! Symlink resource.
use std::path::{Path, PathBuf};

use super::fs::{ensure_parent_dir, is_occupied, remove_existing};
use super::{Resource, ResourceChange, ResourceState};
use crate::error::StepError;

/// A symlink at `target` that should point to `source`.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The file or directory the link points to.
    pub source: PathBuf,
    /// Where the link lives.
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Whether `target` already resolves to `source`.
    ///
    /// Compares the raw link text first, then both fully resolved paths.  The
    /// target need not be a symlink itself: a path reached through a
    /// symlinked parent directory (`~/.config/kitty -> dotfiles/kitty`) is
    /// the source file and must never be replaced.
    #[must_use]
    pub fn resolves_to_source(&self) -> bool {
        if std::fs::read_link(&self.target).is_ok_and(|existing| existing == self.source) {
            return true;
        }
        match (
            dunce::canonicalize(&self.target),
            dunce::canonicalize(&self.source),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl Resource for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn current_state(&self) -> ResourceState {
        if !self.source.exists() {
            return ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            };
        }
        if self.resolves_to_source() {
            return ResourceState::Correct;
        }
        match self.target.symlink_metadata() {
            Err(_) => ResourceState::Missing,
            Ok(meta) => ResourceState::Incorrect {
                current: describe_occupant(&self.target, &meta),
            },
        }
    }

    fn apply(&self) -> Result<ResourceChange, StepError> {
        let replaced = remove_existing(&self.target)?;
        ensure_parent_dir(&self.target)?;
        create_symlink(&self.source, &self.target)?;
        Ok(ResourceChange::Applied { replaced })
    }
}

fn describe_occupant(path: &Path, meta: &std::fs::Metadata) -> String {
    if meta.is_symlink() {
        std::fs::read_link(path).map_or_else(
            |_| "unreadable symlink".to_string(),
            |dest| format!("points to {}", dest.display()),
        )
    } else if meta.is_dir() {
        "directory".to_string()
    } else {
        "regular file".to_string()
    }
}

/// Create a symlink at `link` pointing to `source`.
fn create_symlink(source: &Path, link: &Path) -> Result<(), StepError> {
    debug_assert!(!is_occupied(link), "link path must be vacant");
    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(source, link);
    #[cfg(not(unix))]
    let result = Err::<(), _>(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!("symlinks to {} are only created on Unix", source.display()),
    ));
    result.map_err(|e| StepError::fs("link", link, e))
}
