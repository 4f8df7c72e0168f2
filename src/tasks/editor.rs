//! Vim configuration.
use super::link::{LinkPath, ensure_step};
use super::{Component, Context, StepKind, StepTally};

/// `~/.vimrc`.
pub const VIMRC: LinkPath = LinkPath {
    source: "vim/.vimrc",
    target: ".vimrc",
    label: "Vim configuration",
};

/// Links the editor configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct EditorConfig;

impl Component for EditorConfig {
    fn name(&self) -> &str {
        "Vim Config"
    }

    fn description(&self) -> String {
        "Vim editor configuration".to_string()
    }

    fn run(&self, ctx: &Context) -> StepTally {
        ensure_step(ctx, &VIMRC.resolve(ctx), StepKind::Required)
    }
}
