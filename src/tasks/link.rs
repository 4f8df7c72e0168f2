//! Symlink resolution with conflict handling.
//!
//! [`ensure`] converges one [`LinkSpec`]: a correct link is left alone
//! without asking anything, a vacant target is linked, and an occupied target
//! is replaced only after confirmation (or unconditionally for
//! [`OnConflict::Replace`]).  No error ever escapes; failures become
//! [`LinkOutcome::Failed`].
use std::fmt;
use std::path::PathBuf;

use super::Context;
use super::tally::StepKind;
use crate::resources::{Resource, ResourceChange, ResourceState, SymlinkResource};

/// What to do when the target is occupied by something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnConflict {
    /// Ask before replacing (default answer: replace).
    Confirm,
    /// Replace without asking.
    Replace,
}

/// One link to converge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    /// File inside the dotfiles tree.
    pub source: PathBuf,
    /// Link location under the home directory.
    pub target: PathBuf,
    /// Human-readable label.
    pub label: String,
    /// Conflict policy.
    pub on_conflict: OnConflict,
}

impl LinkSpec {
    /// A link that asks before replacing an occupied target.
    #[must_use]
    pub fn new(source: PathBuf, target: PathBuf, label: impl Into<String>) -> Self {
        Self {
            source,
            target,
            label: label.into(),
            on_conflict: OnConflict::Confirm,
        }
    }

    /// Replace an occupied target without asking.
    #[must_use]
    pub const fn replacing(mut self) -> Self {
        self.on_conflict = OnConflict::Replace;
        self
    }
}

/// A fixed link location: source relative to the dotfiles root, target
/// relative to the home directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPath {
    /// Source, relative to the dotfiles root.
    pub source: &'static str,
    /// Target, relative to the home directory.
    pub target: &'static str,
    /// Human-readable label.
    pub label: &'static str,
}

impl LinkPath {
    /// Resolve against the context's dotfiles root and home directory.
    #[must_use]
    pub fn resolve(&self, ctx: &Context) -> LinkSpec {
        LinkSpec::new(
            ctx.dotfile(self.source),
            ctx.home_path(self.target),
            self.label,
        )
    }
}

/// Result of [`ensure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The target was vacant and is now linked.
    Created,
    /// Something occupied the target; it was removed and the link created.
    ReplacedThenCreated,
    /// The target already resolved to the source; nothing was done.
    AlreadyLinked,
    /// The user chose to keep the existing target.
    SkippedUserDeclined,
    /// The source does not exist; nothing was done.
    SkippedSourceMissing,
    /// A filesystem operation failed.
    Failed(String),
}

impl LinkOutcome {
    /// Whether this outcome counts as a successful step.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Created
                | Self::ReplacedThenCreated
                | Self::AlreadyLinked
                | Self::SkippedSourceMissing
        )
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::ReplacedThenCreated => write!(f, "replaced"),
            Self::AlreadyLinked => write!(f, "already linked"),
            Self::SkippedUserDeclined => write!(f, "kept existing"),
            Self::SkippedSourceMissing => write!(f, "source missing"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Ensure `spec.target` is a symlink to `spec.source`.
///
/// Never prompts when the link is already correct.
pub fn ensure(ctx: &Context, spec: &LinkSpec) -> LinkOutcome {
    let resource = SymlinkResource::new(spec.source.clone(), spec.target.clone());
    let outcome = match resource.current_state() {
        ResourceState::Invalid { reason } => {
            ctx.log.debug(&format!("{}: {reason}", spec.label));
            LinkOutcome::SkippedSourceMissing
        }
        ResourceState::Correct => LinkOutcome::AlreadyLinked,
        ResourceState::Missing => apply(&resource),
        ResourceState::Incorrect { current } => {
            ctx.log.debug(&format!("{}: {current}", spec.target.display()));
            let replace = spec.on_conflict == OnConflict::Replace
                || ctx.confirm(
                    &format!("{} already exists. Replace it?", spec.target.display()),
                    true,
                );
            if replace {
                apply(&resource)
            } else {
                LinkOutcome::SkippedUserDeclined
            }
        }
    };
    report(ctx, spec, &outcome);
    outcome
}

/// [`ensure`] as a counted or best-effort step.
pub fn ensure_step(ctx: &Context, spec: &LinkSpec, kind: StepKind) -> super::StepTally {
    kind.tally(ensure(ctx, spec).is_success())
}

fn apply(resource: &SymlinkResource) -> LinkOutcome {
    match resource.apply() {
        Ok(ResourceChange::Applied { replaced: true }) => LinkOutcome::ReplacedThenCreated,
        Ok(ResourceChange::Applied { replaced: false }) => LinkOutcome::Created,
        Ok(ResourceChange::AlreadyCorrect) => LinkOutcome::AlreadyLinked,
        Ok(ResourceChange::Skipped { reason }) => LinkOutcome::Failed(reason),
        Err(e) => LinkOutcome::Failed(e.to_string()),
    }
}

fn report(ctx: &Context, spec: &LinkSpec, outcome: &LinkOutcome) {
    match outcome {
        LinkOutcome::Created | LinkOutcome::ReplacedThenCreated => {
            ctx.log.info(&format!("✓ Created symlink: {}", spec.label));
        }
        LinkOutcome::AlreadyLinked => {
            ctx.log.info(&format!("✓ {} already linked", spec.label));
        }
        LinkOutcome::SkippedUserDeclined => {
            ctx.log.warn(&format!("Skipping {}", spec.label));
        }
        LinkOutcome::SkippedSourceMissing => {
            ctx.log.debug(&format!("{} not in dotfiles, nothing to link", spec.label));
        }
        LinkOutcome::Failed(reason) => {
            ctx.log.error(&format!(
                "Failed to create symlink for {}: {reason}",
                spec.label
            ));
        }
    }
}
