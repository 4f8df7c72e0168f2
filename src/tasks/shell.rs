//! Zsh configuration: Oh My Zsh, dotfiles, theme and modules.
use std::path::{Path, PathBuf};

use super::link::{LinkOutcome, LinkPath, LinkSpec, ensure, ensure_step};
use super::{Component, Context, StepKind, StepTally};
use crate::exec::Invocation;

/// Unattended Oh My Zsh installer.
const OH_MY_ZSH_INSTALL: &str = r#"sh -c "$(curl -fsSL https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh)" "" --unattended"#;

/// Shell dotfiles linked into the home directory.
pub const LINKS: [LinkPath; 3] = [
    ZSHRC,
    LinkPath {
        source: "zsh/.zsh_plugins",
        target: ".zsh_plugins",
        label: "Zsh plugins",
    },
    LinkPath {
        source: "zsh/.p10k.zsh",
        target: ".p10k.zsh",
        label: "Powerlevel10k theme",
    },
];

/// The main zsh configuration file.
pub const ZSHRC: LinkPath = LinkPath {
    source: "zsh/.zshrc",
    target: ".zshrc",
    label: "Zsh configuration",
};

const THEME: LinkPath = LinkPath {
    source: "iterm/steeef-lambda.zsh-theme",
    target: ".oh-my-zsh/custom/themes/steeef-lambda.zsh-theme",
    label: "Custom Zsh theme",
};

/// Zsh, Oh My Zsh and plugin configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellConfig;

impl ShellConfig {
    fn ensure_oh_my_zsh(ctx: &Context) -> bool {
        if ctx.home_path(".oh-my-zsh").exists() {
            ctx.log.info("✓ Oh My Zsh already installed");
            return true;
        }
        ctx.runner()
            .run(&Invocation::interactive(OH_MY_ZSH_INSTALL).described("Installing Oh My Zsh..."))
    }

    /// Link every top-level `zsh/*.zsh` module into `~/.config/zsh/`.
    ///
    /// Best-effort: the count is reported but never tallied.
    fn link_modules(ctx: &Context) {
        let modules = zsh_modules(&ctx.dotfile("zsh"));
        if modules.is_empty() {
            return;
        }
        ctx.log.info("Setting up modular Zsh configuration...");
        let config_dir = ctx.home_path(".config/zsh");
        let linked = modules
            .into_iter()
            .map(|module| {
                let name = module
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let target = config_dir.join(&name);
                ensure(ctx, &LinkSpec::new(module, target, format!("Zsh module: {name}")))
            })
            .filter(LinkOutcome::is_success)
            .count();
        ctx.log.info(&format!("✓ {linked} Zsh modules configured"));
    }
}

/// `*.zsh` files directly inside `dir`, hidden ones included, sorted by name.
fn zsh_modules(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut modules: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "zsh"))
        .collect();
    modules.sort();
    modules
}

impl Component for ShellConfig {
    fn name(&self) -> &str {
        "Shell Config"
    }

    fn description(&self) -> String {
        "Zsh, Oh My Zsh, plugins".to_string()
    }

    fn run(&self, ctx: &Context) -> StepTally {
        let mut tally = StepTally::single(Self::ensure_oh_my_zsh(ctx));
        for link in LINKS.iter().chain([&THEME]) {
            tally += ensure_step(ctx, &link.resolve(ctx), StepKind::Required);
        }
        Self::link_modules(ctx);
        tally
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::FakeExecutor;
    use crate::tasks::test_helpers::TestEnv;

    #[test]
    fn fresh_home_installs_oh_my_zsh_and_links_everything() {
        let env = TestEnv::new();
        let zshrc = env.write_dotfile("zsh/.zshrc", "");
        env.write_dotfile("zsh/.zsh_plugins", "");
        env.write_dotfile("zsh/.p10k.zsh", "");
        let theme = env.write_dotfile("iterm/steeef-lambda.zsh-theme", "");
        let ctx = env.context(true);

        assert_eq!(ShellConfig.run(&ctx), StepTally::new(5, 5));
        assert!(env.executor.commands()[0].contains("ohmyzsh"));
        assert!(env.is_linked(".zshrc", &zshrc));
        assert!(env.is_linked(".oh-my-zsh/custom/themes/steeef-lambda.zsh-theme", &theme));
    }

    #[test]
    fn existing_oh_my_zsh_is_not_reinstalled() {
        let env = TestEnv::new();
        env.mkdir_home(".oh-my-zsh");
        let ctx = env.context(true);
        let tally = ShellConfig.run(&ctx);
        assert!(env.executor.commands().is_empty());
        assert_eq!(tally, StepTally::new(5, 5), "missing sources are not failures");
    }

    #[test]
    fn failed_oh_my_zsh_install_is_one_issue() {
        let env = TestEnv::with_executor(FakeExecutor::new().failing("ohmyzsh"));
        env.write_dotfile("zsh/.zshrc", "");
        let ctx = env.context(true);
        assert_eq!(ShellConfig.run(&ctx), StepTally::new(4, 5));
    }

    #[test]
    fn modules_are_linked_but_not_counted() {
        let env = TestEnv::new();
        env.mkdir_home(".oh-my-zsh");
        let aliases = env.write_dotfile("zsh/aliases.zsh", "");
        env.write_dotfile("zsh/functions.zsh", "");
        env.write_dotfile("zsh/.p10k.zsh", "");
        let ctx = env.context(true);
        assert_eq!(ShellConfig.run(&ctx).total, 5);
        assert!(env.is_linked(".config/zsh/aliases.zsh", &aliases));
        assert!(env.home.join(".config/zsh/functions.zsh").exists());
        assert!(env.home.join(".config/zsh/.p10k.zsh").exists());
        assert!(env.log.messages().iter().any(|m| m == "✓ 3 Zsh modules configured"));
    }

    #[test]
    fn zsh_modules_sorted_and_filtered() {
        let env = TestEnv::new();
        env.write_dotfile("zsh/b.zsh", "");
        env.write_dotfile("zsh/a.zsh", "");
        env.write_dotfile("zsh/.p10k.zsh", "");
        env.write_dotfile("zsh/readme.md", "");
        env.write_dotfile("zsh/.zshrc", "");
        let names: Vec<_> = zsh_modules(&env.root.join("zsh"))
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![".p10k.zsh", "a.zsh", "b.zsh"]);
    }
}
