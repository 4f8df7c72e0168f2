//! Kitty terminal configuration.
use super::link::{LinkPath, ensure_step};
use super::{Component, Context, StepKind, StepTally};

/// `~/.config/kitty/kitty.conf`.
pub const KITTY_CONF: LinkPath = LinkPath {
    source: "kitty/kitty.conf",
    target: ".config/kitty/kitty.conf",
    label: "Kitty configuration",
};

const KITTY_CUSTOMIZATIONS: LinkPath = LinkPath {
    source: "kitty/kitty-customizations",
    target: ".config/kitty/kitty-customizations",
    label: "Kitty customizations",
};

/// Links the terminal emulator configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfig;

impl Component for TerminalConfig {
    fn name(&self) -> &str {
        "Kitty"
    }

    fn description(&self) -> String {
        "Kitty terminal configuration".to_string()
    }

    fn run(&self, ctx: &Context) -> StepTally {
        [KITTY_CONF, KITTY_CUSTOMIZATIONS]
            .iter()
            .map(|link| ensure_step(ctx, &link.resolve(ctx), StepKind::Required))
            .sum()
    }
}
