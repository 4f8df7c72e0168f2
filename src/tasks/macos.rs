//! macOS-only components: window manager, terminal profiles, desktop
//! widgets and system preferences.
//!
//! [`platform_extras`] picks the extras for a profile once; non-macOS
//! profiles get [`NoExtras`], which contributes nothing.
use std::fmt;
use std::path::PathBuf;

use super::link::{LinkPath, LinkSpec, ensure, ensure_step};
use super::{Component, Context, StepKind, StepTally};
use crate::exec::Invocation;
use crate::platform::OsProfile;

/// `~/.aerospace.toml`.
pub const AEROSPACE: LinkPath = LinkPath {
    source: "aerospace/.aerospace.toml",
    target: ".aerospace.toml",
    label: "AeroSpace configuration",
};

/// iTerm2 dynamic profiles.
pub const ITERM_PROFILES: LinkPath = LinkPath {
    source: "iterm/iterm-profiles.json",
    target: "Library/Application Support/iTerm2/DynamicProfiles/iterm-profiles.json",
    label: "iTerm2 profiles",
};

const SIMPLEBARRC: LinkPath = LinkPath {
    source: "ubersicht/simple-bar/simplebarrc",
    target: ".simplebarrc",
    label: "Simple-bar configuration",
};

/// Übersicht widget directory, relative to home.
const WIDGETS_DIR: &str = "Library/Application Support/Übersicht/widgets";

const SIMPLE_BAR_REPO: &str = "https://github.com/Jean-Tinland/simple-bar";

/// Extra components contributed by the OS profile.
pub trait PlatformExtras: fmt::Debug {
    /// Components to run after the common ones, in order.
    ///
    /// `skip_system` excludes the system-preferences component.
    fn components(&self, skip_system: bool) -> Vec<PlannedComponent>;
}

/// A component together with whether this run will execute it.
pub struct PlannedComponent {
    /// The component.
    pub component: Box<dyn Component>,
    /// `false` when a flag skipped it; it is listed but never run.
    pub enabled: bool,
}

impl PlannedComponent {
    /// A component that will run.
    #[must_use]
    pub fn enabled(component: impl Component + 'static) -> Self {
        Self::new(component, true)
    }

    /// A component that runs unless `skip`.
    #[must_use]
    pub fn unless(skip: bool, component: impl Component + 'static) -> Self {
        Self::new(component, !skip)
    }

    fn new(component: impl Component + 'static, enabled: bool) -> Self {
        Self {
            component: Box::new(component),
            enabled,
        }
    }
}

impl fmt::Debug for PlannedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannedComponent")
            .field("component", &self.component.name())
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Select the extras for `profile`.
#[must_use]
pub fn platform_extras(profile: OsProfile) -> Box<dyn PlatformExtras> {
    match profile {
        OsProfile::MacOs => Box::new(MacOsExtras::default()),
        OsProfile::Ubuntu => Box::new(NoExtras),
    }
}

/// Extras for profiles without OS-specific components.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExtras;

impl PlatformExtras for NoExtras {
    fn components(&self, _skip_system: bool) -> Vec<PlannedComponent> {
        Vec::new()
    }
}

/// The macOS component set.
#[derive(Debug, Clone)]
pub struct MacOsExtras {
    applications_dir: PathBuf,
}

impl Default for MacOsExtras {
    fn default() -> Self {
        Self {
            applications_dir: PathBuf::from("/Applications"),
        }
    }
}

impl MacOsExtras {
    /// Look for installed apps in `dir` instead of `/Applications`.
    #[must_use]
    pub const fn with_applications_dir(dir: PathBuf) -> Self {
        Self {
            applications_dir: dir,
        }
    }
}

impl PlatformExtras for MacOsExtras {
    fn components(&self, skip_system: bool) -> Vec<PlannedComponent> {
        vec![
            PlannedComponent::enabled(WindowManagerConfig),
            PlannedComponent::enabled(TerminalProfileConfig),
            PlannedComponent::enabled(DesktopWidgets {
                applications_dir: self.applications_dir.clone(),
            }),
            PlannedComponent::unless(skip_system, SystemPreferences),
        ]
    }
}

/// AeroSpace window manager configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowManagerConfig;

impl Component for WindowManagerConfig {
    fn name(&self) -> &str {
        "AeroSpace"
    }

    fn description(&self) -> String {
        "Window management (macOS only)".to_string()
    }

    fn run(&self, ctx: &Context) -> StepTally {
        ensure_step(ctx, &AEROSPACE.resolve(ctx), StepKind::Required)
    }
}

/// iTerm2 profile configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalProfileConfig;

impl Component for TerminalProfileConfig {
    fn name(&self) -> &str {
        "iTerm2"
    }

    fn description(&self) -> String {
        "Terminal profiles (macOS only)".to_string()
    }

    fn run(&self, ctx: &Context) -> StepTally {
        ensure_step(ctx, &ITERM_PROFILES.resolve(ctx), StepKind::Required)
    }
}

/// Übersicht, simple-bar and the AeroSpace mode widget.
#[derive(Debug, Clone)]
pub struct DesktopWidgets {
    applications_dir: PathBuf,
}

impl DesktopWidgets {
    /// Planned steps: app, simple-bar, mode widget.
    const STEPS: u32 = 3;

    fn app_installed(&self) -> bool {
        ["Übersicht.app", "Uebersicht.app"]
            .iter()
            .any(|app| self.applications_dir.join(app).exists())
    }

    fn ensure_app(&self, ctx: &Context) -> bool {
        if self.app_installed() {
            ctx.log.info("✓ Übersicht already installed");
            return true;
        }
        ctx.runner().run(
            &Invocation::interactive("brew install --cask ubersicht")
                .described("Installing Übersicht (may require password)..."),
        )
    }

    fn ensure_simple_bar(ctx: &Context) -> bool {
        let dir = ctx.home_path(WIDGETS_DIR).join("simple-bar");
        if dir.exists() {
            ctx.log.info("✓ Simple-bar already installed");
            return true;
        }
        if let Err(e) = crate::resources::fs::ensure_parent_dir(&dir) {
            ctx.log.error(&e.to_string());
            return false;
        }
        let command = format!("git clone {SIMPLE_BAR_REPO} '{}'", dir.display());
        ctx.runner()
            .run(&Invocation::captured(&command).described("Installing simple-bar..."))
    }

    fn mode_widget(ctx: &Context) -> LinkSpec {
        LinkSpec::new(
            ctx.dotfile("ubersicht/aerospace-mode.jsx"),
            ctx.home_path(WIDGETS_DIR).join("aerospace-mode.jsx"),
            "AeroSpace mode indicator",
        )
        .replacing()
    }

    fn restart(ctx: &Context) {
        ctx.log.info("Restarting Übersicht to recognize new widgets...");
        let runner = ctx.runner();
        runner.run_best_effort(
            &Invocation::captured("pkill -f Übersicht").described("Stopping Übersicht..."),
        );
        runner.run_best_effort(
            &Invocation::captured("open -a Übersicht").described("Starting Übersicht..."),
        );
    }
}

impl Component for DesktopWidgets {
    fn name(&self) -> &str {
        "Übersicht"
    }

    fn description(&self) -> String {
        "Status bar and widgets (macOS only)".to_string()
    }

    fn run(&self, ctx: &Context) -> StepTally {
        if !ctx.confirm(
            "Set up Übersicht with simple-bar and AeroSpace mode indicator?",
            true,
        ) {
            ctx.log.warn("Skipping Übersicht setup");
            return StepTally::declined(Self::STEPS);
        }

        let mut tally = StepTally::ZERO;
        tally.record(self.ensure_app(ctx));
        tally.record(Self::ensure_simple_bar(ctx));
        tally += ensure_step(ctx, &SIMPLEBARRC.resolve(ctx), StepKind::BestEffort);
        tally.record(ensure(ctx, &Self::mode_widget(ctx)).is_success());
        Self::restart(ctx);
        tally
    }
}

/// macOS `defaults` preferences.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPreferences;

impl Component for SystemPreferences {
    fn name(&self) -> &str {
        "System Prefs"
    }

    fn description(&self) -> String {
        "macOS system preferences".to_string()
    }

    fn run(&self, ctx: &Context) -> StepTally {
        if !ctx.confirm("This will modify system preferences. Continue?", true) {
            ctx.log.warn("Skipping system preferences configuration.");
            return StepTally::declined(1);
        }

        let runner = ctx.runner();
        let mut all_ok = true;
        for command in ctx.config.preferences.commands_for(&ctx.home) {
            all_ok &= runner.run(&Invocation::captured(&command));
        }

        if all_ok {
            ctx.log.info("Restarting applications to apply changes...");
            for command in &ctx.config.preferences.restart {
                runner.run_best_effort(&Invocation::captured(command));
            }
        }
        StepTally::single(all_ok)
    }
}
