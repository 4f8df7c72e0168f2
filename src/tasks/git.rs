//! Git configuration.
use super::link::{LinkPath, ensure_step};
use super::{Component, Context, StepKind, StepTally};

/// `~/.gitconfig`.
pub const GITCONFIG: LinkPath = LinkPath {
    source: "git/.gitconfig",
    target: ".gitconfig",
    label: "Git configuration",
};

/// Links the git configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitConfig;

impl Component for GitConfig {
    fn name(&self) -> &str {
        "Git Config"
    }

    fn description(&self) -> String {
        "Git configuration and aliases".to_string()
    }

    fn run(&self, ctx: &Context) -> StepTally {
        ensure_step(ctx, &GITCONFIG.resolve(ctx), StepKind::Required)
    }
}
