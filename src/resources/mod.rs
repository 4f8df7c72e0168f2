//! Idempotent resource primitives (check + apply pattern).
pub mod fs;
pub mod symlink;

pub use symlink::SymlinkResource;

use crate::error::StepError;

/// State of a resource on disk.
///
/// # Examples
///
/// ```
/// use dotfiles_installer::resources::ResourceState;
///
/// let wrong = ResourceState::Incorrect { current: "points to /other".into() };
/// assert_ne!(wrong, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the target (a dangling link counts as present).
    Missing,
    /// The target already matches the desired state.
    Correct,
    /// Something else occupies the target.
    Incorrect {
        /// What is there now.
        current: String,
    },
    /// The resource cannot be applied at all.
    Invalid {
        /// Why not.
        reason: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created, replacing `replaced` if it was occupied.
    Applied {
        /// Whether an existing entry had to be removed first.
        replaced: bool,
    },
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// A resource that can check its own state and converge to the desired one.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the resource.
    fn current_state(&self) -> ResourceState;

    /// Bring the resource to its desired state, overwriting whatever is
    /// there.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Filesystem`] if removing the old entry or creating
    /// the new one fails.
    fn apply(&self) -> Result<ResourceChange, StepError>;

    /// Whether [`apply`](Self::apply) would change anything.
    fn needs_change(&self) -> bool {
        matches!(
            self.current_state(),
            ResourceState::Missing | ResourceState::Incorrect { .. }
        )
    }
}
