//! File-system resource helpers.
use std::path::Path;

use crate::error::StepError;

/// Ensure the parent directory of `path` exists.
///
/// # Errors
///
/// Returns [`StepError::Filesystem`] if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), StepError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StepError::fs("create", parent, e))?;
    }
    Ok(())
}

/// Whether anything, including a dangling symlink, exists at `path`.
#[must_use]
pub fn is_occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Remove whatever is at `path`.
///
/// Symlinks (dangling or not) and regular files are unlinked; a real
/// directory is removed recursively.  Does nothing if `path` is vacant.
///
/// Returns whether something was removed.
///
/// # Errors
///
/// Returns [`StepError::Filesystem`] if the entry cannot be removed.
pub fn remove_existing(path: &Path) -> Result<bool, StepError> {
    let Ok(meta) = path.symlink_metadata() else {
        return Ok(false);
    };
    let result = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|e| StepError::fs("remove", path, e))?;
    Ok(true)
}
