//! Installer configuration: package lists, manifests and system preferences.
//!
//! Everything is optional.  A `dotfiles.toml` at the dotfiles root overrides
//! individual sections; whatever it leaves out keeps the built-in defaults.
//!
//! ```toml
//! [homebrew]
//! manifests = [{ file = "brew/Brewfile.devtools", description = "development tools" }]
//! optional_manifest = "brew/Brewfile.optional"
//!
//! [apt]
//! packages = ["git", "zsh"]
//! optional = ["exa"]
//!
//! [preferences]
//! commands = ['defaults write com.apple.dock autohide -bool true']
//! restart = ["killall Dock 2>/dev/null || true"]
//! ```
pub mod toml_loader;
pub mod validation;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Name of the optional configuration file at the dotfiles root.
pub const CONFIG_FILE: &str = "dotfiles.toml";

/// Placeholder in preference commands replaced by the home directory.
const HOME_PLACEHOLDER: &str = "{home}";

/// All configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Dotfiles source tree; set by [`Config::load`], never read from TOML.
    #[serde(skip)]
    pub root: PathBuf,
    /// Homebrew manifests.
    pub homebrew: HomebrewConfig,
    /// APT package lists.
    pub apt: AptConfig,
    /// macOS `defaults` commands.
    pub preferences: PreferencesConfig,
}

impl Config {
    /// Load `dotfiles.toml` from `root`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml_loader::load_config(&root.join(CONFIG_FILE))?;
        config.root = root.to_path_buf();
        Ok(config)
    }

    /// Defaults rooted at `root`, without reading any file.
    #[must_use]
    pub fn with_root(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ..Self::default()
        }
    }
}

/// One Homebrew bundle file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Path relative to the dotfiles root.
    pub file: PathBuf,
    /// What the manifest installs, for progress messages.
    pub description: String,
}

impl Manifest {
    fn new(file: &str, description: &str) -> Self {
        Self {
            file: PathBuf::from(file),
            description: description.to_string(),
        }
    }
}

/// `[homebrew]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomebrewConfig {
    /// Bundle files applied in order; missing ones are skipped.
    pub manifests: Vec<Manifest>,
    /// Bundle the user may apply by hand; only ever mentioned.
    pub optional_manifest: Option<PathBuf>,
}

impl Default for HomebrewConfig {
    fn default() -> Self {
        Self {
            manifests: vec![
                Manifest::new("brew/Brewfile.devtools", "development tools"),
                Manifest::new("brew/Brewfile.k8s", "Kubernetes tools"),
                Manifest::new("brew/Brewfile.media", "media tools"),
                Manifest::new("brew/Brewfile.gui", "GUI applications"),
                Manifest::new("brew/Brewfile.apps", "applications"),
            ],
            optional_manifest: Some(PathBuf::from("brew/Brewfile.optional")),
        }
    }
}

/// `[apt]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AptConfig {
    /// Core packages installed in a single invocation.
    pub packages: Vec<String>,
    /// Packages attempted one at a time as best-effort steps.
    pub optional: Vec<String>,
}

impl Default for AptConfig {
    fn default() -> Self {
        Self {
            packages: [
                "git",
                "git-lfs",
                "curl",
                "wget",
                "python3",
                "python3-pip",
                "nodejs",
                "npm",
                "zsh",
                "bat",
                "ripgrep",
                "jq",
                "tree",
                "tmux",
                "rsync",
                "coreutils",
            ]
            .map(String::from)
            .to_vec(),
            optional: vec!["exa".to_string()],
        }
    }
}

/// `[preferences]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreferencesConfig {
    /// Setting commands, run in order.
    pub commands: Vec<String>,
    /// Restarts run after every command succeeded.
    pub restart: Vec<String>,
}

impl PreferencesConfig {
    /// Setting commands with `{home}` expanded.
    #[must_use]
    pub fn commands_for(&self, home: &Path) -> Vec<String> {
        let home = home.display().to_string();
        self.commands
            .iter()
            .map(|cmd| cmd.replace(HOME_PLACEHOLDER, &home))
            .collect()
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        let commands = [
            // Interface
            r#"defaults write NSGlobalDomain AppleInterfaceStyle -string "Dark""#,
            "defaults write com.apple.dock autohide -bool true",
            "defaults write com.apple.dock tilesize -int 48",
            r#"defaults write com.apple.dock orientation -string "left""#,
            "defaults write NSGlobalDomain AppleShowAllExtensions -bool true",
            "defaults write com.apple.finder AppleShowAllFiles -bool true",
            "defaults write com.apple.finder ShowPathbar -bool true",
            "defaults write com.apple.finder ShowStatusBar -bool true",
            // Input
            "defaults write NSGlobalDomain com.apple.swipescrolldirection -bool false",
            "defaults write com.apple.driver.AppleBluetoothMultitouch.trackpad Clicking -bool true",
            "defaults write NSGlobalDomain KeyRepeat -int 2",
            "defaults write NSGlobalDomain InitialKeyRepeat -int 15",
            "defaults write NSGlobalDomain NSAutomaticCapitalizationEnabled -bool false",
            // Screenshots and menu bar
            r#"defaults write com.apple.screencapture location -string "{home}/Downloads""#,
            r#"defaults write com.apple.screencapture type -string "png""#,
            "defaults write com.apple.screencapture disable-shadow -bool true",
            "defaults write NSGlobalDomain AppleKeyboardUIMode -int 3",
            r#"defaults write com.apple.menuextra.battery ShowPercent -string "YES""#,
            // Security
            "defaults write com.apple.screensaver askForPassword -int 1",
            "defaults write com.apple.screensaver askForPasswordDelay -int 0",
            // TextEdit
            "defaults write com.apple.TextEdit RichText -int 0",
            "defaults write com.apple.TextEdit PlainTextEncoding -int 4",
        ];
        let restart = [
            "killall Dock 2>/dev/null || true",
            "killall Finder 2>/dev/null || true",
            "killall SystemUIServer 2>/dev/null || true",
        ];
        Self {
            commands: commands.map(String::from).to_vec(),
            restart: restart.map(String::from).to_vec(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.homebrew.manifests.len(), 5);
        assert_eq!(config.homebrew.manifests[0].file, Path::new("brew/Brewfile.devtools"));
        assert_eq!(config.apt.packages.len(), 16);
        assert_eq!(config.apt.optional, vec!["exa"]);
        assert_eq!(config.preferences.commands.len(), 22);
        assert_eq!(config.preferences.restart.len(), 3);
    }

    #[test]
    fn file_overrides_only_named_sections() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[apt]\npackages = [\"git\", \"zsh\"]\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.apt.packages, vec!["git", "zsh"]);
        assert_eq!(config.apt.optional, vec!["exa"], "unset fields keep defaults");
        assert_eq!(config.homebrew, HomebrewConfig::default());
    }

    #[test]
    fn manifests_parse_from_inline_tables() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            concat!(
                "[homebrew]\n",
                "manifests = [{ file = \"brew/Brewfile\", description = \"everything\" }]\n",
            ),
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(
            config.homebrew.manifests,
            vec![Manifest::new("brew/Brewfile", "everything")]
        );
        assert_eq!(
            config.homebrew.optional_manifest,
            Some(PathBuf::from("brew/Brewfile.optional"))
        );
    }

    #[test]
    fn unknown_section_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[pacman]\npackages = []\n").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn home_placeholder_is_expanded() {
        let prefs = PreferencesConfig::default();
        let commands = prefs.commands_for(Path::new("/Users/me"));
        assert!(
            commands
                .iter()
                .any(|c| c.contains(r#"location -string "/Users/me/Downloads""#))
        );
        assert!(commands.iter().all(|c| !c.contains(HOME_PLACEHOLDER)));
    }
}
