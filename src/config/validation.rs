//! Configuration sanity checks reported as warnings.
use std::collections::HashSet;

use super::Config;
use crate::platform::OsProfile;

/// A non-fatal problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Section that triggered the warning (e.g. `"homebrew"`).
    pub section: &'static str,
    /// Offending item.
    pub item: String,
    /// Human-readable message.
    pub message: String,
}

impl ValidationWarning {
    fn new(section: &'static str, item: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            section,
            item: item.into(),
            message: message.into(),
        }
    }
}

impl Config {
    /// Check the sections relevant to `profile`.
    ///
    /// Missing manifests are not reported here; the Homebrew strategy warns
    /// about them as it skips them.
    #[must_use]
    pub fn validate(&self, profile: OsProfile) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        match profile {
            OsProfile::MacOs => {
                for manifest in &self.homebrew.manifests {
                    if manifest.file.is_absolute() {
                        warnings.push(ValidationWarning::new(
                            "homebrew",
                            manifest.file.display().to_string(),
                            "manifest paths are relative to the dotfiles root",
                        ));
                    }
                }
                for cmd in &self.preferences.commands {
                    if cmd.trim().is_empty() {
                        warnings.push(ValidationWarning::new(
                            "preferences",
                            cmd.clone(),
                            "empty preference command",
                        ));
                    }
                }
            }
            OsProfile::Ubuntu => {
                if self.apt.packages.is_empty() {
                    warnings.push(ValidationWarning::new(
                        "apt",
                        "packages",
                        "no core packages configured",
                    ));
                }
                let mut seen = HashSet::new();
                for pkg in self.apt.packages.iter().chain(&self.apt.optional) {
                    if !seen.insert(pkg.as_str()) {
                        warnings.push(ValidationWarning::new(
                            "apt",
                            pkg.clone(),
                            "package listed more than once",
                        ));
                    }
                }
            }
        }
        warnings
    }
}
