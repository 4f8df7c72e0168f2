//! Install command: present the plan, confirm, run every component and
//! summarize the aggregate tally.
use std::fmt;
use std::sync::Arc;

use super::CommandSetup;
use crate::cli::InstallOpts;
use crate::logging::{Log, StepEntry};
use crate::tasks::editor::EditorConfig;
use crate::tasks::git::GitConfig;
use crate::tasks::macos::{PlannedComponent, PlatformExtras, platform_extras};
use crate::tasks::packages::{InstallPackages, create_package_manager};
use crate::tasks::shell::ShellConfig;
use crate::tasks::terminal::{KITTY_CONF, TerminalConfig};
use crate::tasks::{self, Context, StepTally};

/// How the aggregate tally maps onto the process exit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Exit 0 whenever the run completes or is cancelled; failures are
    /// reported, not signalled.
    #[default]
    Lenient,
    /// Exit 1 when any planned step did not succeed.
    Strict,
}

impl ExitPolicy {
    /// Process exit status for `report` under this policy.
    #[must_use]
    pub const fn exit_code(self, report: &InstallReport) -> i32 {
        match self {
            Self::Strict if !report.tally.is_complete() => 1,
            Self::Strict | Self::Lenient => 0,
        }
    }
}

/// Options for one install run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct InstallOptions {
    /// Leave the package manager out of the plan.
    pub skip_packages: bool,
    /// Leave the shell component out of the plan.
    pub skip_shell: bool,
    /// Leave macOS system preferences out of the plan.
    pub skip_system: bool,
    /// Whether the user may be asked questions.
    pub interactive: bool,
    /// Exit status policy.
    pub exit_policy: ExitPolicy,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            skip_packages: false,
            skip_shell: false,
            skip_system: false,
            interactive: true,
            exit_policy: ExitPolicy::Lenient,
        }
    }
}

impl From<&InstallOpts> for InstallOptions {
    fn from(opts: &InstallOpts) -> Self {
        Self {
            skip_packages: opts.skip_packages,
            skip_shell: opts.skip_shell,
            skip_system: opts.skip_system,
            interactive: opts.interactive,
            exit_policy: if opts.strict {
                ExitPolicy::Strict
            } else {
                ExitPolicy::Lenient
            },
        }
    }
}

/// Lifecycle of one orchestrated run.
///
/// `NotStarted → PlanPresented → (Cancelled | Running) → Completed`.
/// `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing has happened yet.
    NotStarted,
    /// The plan has been shown.
    PlanPresented,
    /// The user declined the plan; no step ran.
    Cancelled,
    /// Components are executing.
    Running,
    /// Every enabled component ran.
    Completed,
}

/// Whether a planned component will run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    /// The component runs.
    Install,
    /// A flag excluded the component.
    Skip,
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => f.pad("Install"),
            Self::Skip => f.pad("Skip"),
        }
    }
}

/// One row of the installation plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    /// Component name.
    pub name: String,
    /// Install or skip.
    pub action: PlanAction,
    /// One-line description.
    pub description: String,
}

impl fmt::Display for PlanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<14} {:<8} {}", self.name, self.action, self.description)
    }
}

/// Outcome of [`Orchestrator::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Terminal state reached.
    pub state: RunState,
    /// Sum of every component tally.
    pub tally: StepTally,
    /// Per-component tallies, in run order.
    pub components: Vec<StepEntry>,
}

/// Composes the package strategy and component installers into one run.
#[derive(Debug)]
pub struct Orchestrator<'a> {
    ctx: &'a Context,
    components: Vec<PlannedComponent>,
    state: RunState,
}

impl<'a> Orchestrator<'a> {
    /// Plan a run for the context's profile.
    #[must_use]
    pub fn new(ctx: &'a Context, options: &InstallOptions) -> Self {
        Self::with_extras(ctx, options, platform_extras(ctx.profile).as_ref())
    }

    /// Plan a run using `extras` for the OS-specific components.
    #[must_use]
    pub fn with_extras(
        ctx: &'a Context,
        options: &InstallOptions,
        extras: &dyn PlatformExtras,
    ) -> Self {
        let packages = InstallPackages::new(create_package_manager(ctx.profile, &ctx.config));
        let mut components = vec![
            PlannedComponent::unless(options.skip_packages, packages),
            PlannedComponent::unless(options.skip_shell, ShellConfig),
            PlannedComponent::enabled(GitConfig),
            PlannedComponent::enabled(EditorConfig),
            PlannedComponent::enabled(TerminalConfig),
        ];
        components.extend(extras.components(options.skip_system));
        Self {
            ctx,
            components,
            state: RunState::NotStarted,
        }
    }

    /// Every planned component, including skipped ones.
    #[must_use]
    pub fn plan(&self) -> Vec<PlanEntry> {
        self.components
            .iter()
            .map(|planned| PlanEntry {
                name: planned.component.name().to_string(),
                action: if planned.enabled {
                    PlanAction::Install
                } else {
                    PlanAction::Skip
                },
                description: planned.component.description(),
            })
            .collect()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    fn present_plan(&mut self) {
        let log = &*self.ctx.log;
        log.stage("Installation plan");
        for entry in self.plan() {
            log.info(&entry.to_string());
        }
        self.state = RunState::PlanPresented;
    }

    /// Present the plan, ask for confirmation and run every enabled
    /// component in order.
    ///
    /// Declining the plan cancels the run before any step starts.
    pub fn run(mut self) -> InstallReport {
        self.present_plan();

        if !self.ctx.confirm("Proceed with installation?", true) {
            self.ctx.log.warn("Installation cancelled.");
            self.state = RunState::Cancelled;
            return InstallReport {
                state: self.state,
                tally: StepTally::ZERO,
                components: Vec::new(),
            };
        }

        self.state = RunState::Running;
        let components: Vec<StepEntry> = self
            .components
            .iter()
            .filter(|planned| planned.enabled)
            .map(|planned| StepEntry {
                name: planned.component.name().to_string(),
                tally: tasks::execute(planned.component.as_ref(), self.ctx),
            })
            .collect();
        self.state = RunState::Completed;

        InstallReport {
            state: self.state,
            tally: components.iter().map(|entry| entry.tally).sum(),
            components,
        }
    }
}

/// Follow-up hints shown after a completed run.
#[must_use]
pub fn next_steps(ctx: &Context) -> Vec<&'static str> {
    let mut steps = vec![
        "Run 'exec zsh' to reload your shell",
        "Run 'updateplugins' to refresh Zsh plugins",
    ];
    if ctx.profile.is_macos() {
        steps.extend([
            "Restart iTerm2 to see the new profile",
            "Some macOS changes may require a system restart",
            "For Kitty hotkey window (ctrl+`), set up a macOS shortcut in System Preferences",
        ]);
    }
    if ctx.home_path(KITTY_CONF.target).exists() {
        steps.push("Launch Kitty to use the new terminal configuration");
    }
    steps
}

/// Print the per-component tallies, the aggregate and next steps.
pub fn print_summary(ctx: &Context, report: &InstallReport) {
    let log = &*ctx.log;
    log.stage("Installation complete");
    for entry in &report.components {
        let icon = if entry.tally.is_complete() { "✓" } else { "✗" };
        log.info(&format!("{icon} {} ({})", entry.name, entry.tally));
    }

    let tally = report.tally;
    log.info(&format!(
        "Successfully completed {}/{} steps",
        tally.successes, tally.total
    ));
    if !tally.is_complete() {
        log.warn(&format!("{} steps had issues", tally.issues()));
    }

    log.stage("Next steps");
    for step in next_steps(ctx) {
        log.info(&format!("• {step}"));
    }

    if let Some(path) = log.log_file() {
        log.info(&format!("log: {}", path.display()));
    }
}

/// Run the install command on a completed setup and return the process exit
/// status.
pub fn run(setup: CommandSetup, opts: &InstallOpts, log: Arc<dyn Log>) -> i32 {
    let options = InstallOptions::from(opts);

    log.stage(&format!("Dotfiles installer {}", super::version::current()));
    log.info(&format!("Installing from: {}", setup.config.root.display()));
    log.info(&format!("Target OS: {}", setup.profile));

    let ctx = setup.into_context(log, options.interactive);
    let report = Orchestrator::new(&ctx, &options).run();
    if report.state == RunState::Completed {
        print_summary(&ctx, &report);
    }
    options.exit_policy.exit_code(&report)
}
