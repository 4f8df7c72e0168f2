//! OS profile detection.
use std::fmt;
use std::path::Path;

use crate::error::PlatformError;

/// Release metadata consulted on Linux hosts.
const OS_RELEASE: &str = "/etc/os-release";

/// Supported operating system profile.
///
/// Detected once at startup and read-only afterwards; an unsupported host
/// never produces a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsProfile {
    /// Apple macOS (Homebrew, window manager, system preferences).
    MacOs,
    /// Ubuntu or Debian (APT).
    Ubuntu,
}

impl OsProfile {
    /// Every supported profile.
    pub const ALL: [Self; 2] = [Self::MacOs, Self::Ubuntu];

    /// Whether the macOS-only components apply.
    #[must_use]
    pub const fn is_macos(self) -> bool {
        matches!(self, Self::MacOs)
    }
}

impl fmt::Display for OsProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macos"),
            Self::Ubuntu => write!(f, "ubuntu"),
        }
    }
}

/// Detect the profile of the running host.
///
/// # Errors
///
/// Returns [`PlatformError`] if the host is neither macOS nor an
/// Ubuntu/Debian Linux distribution.
pub fn detect() -> Result<OsProfile, PlatformError> {
    let kernel = kernel_name();
    let release = if kernel == "Linux" {
        read_release(Path::new(OS_RELEASE))
    } else {
        None
    };
    classify(kernel, release.as_deref())
}

/// Classify a kernel name plus optional release metadata into a profile.
///
/// `kernel` follows `uname -s` naming (`Darwin`, `Linux`, ...).
///
/// # Errors
///
/// Returns [`PlatformError::UnsupportedOs`] for any kernel other than
/// `Darwin`/`Linux`, and [`PlatformError::UnsupportedDistribution`] when a
/// Linux host's release metadata mentions neither Ubuntu nor Debian.
pub fn classify(kernel: &str, os_release: Option<&str>) -> Result<OsProfile, PlatformError> {
    match kernel {
        "Darwin" => Ok(OsProfile::MacOs),
        "Linux" => {
            let release = os_release.unwrap_or_default().to_lowercase();
            if release.contains("ubuntu") || release.contains("debian") {
                Ok(OsProfile::Ubuntu)
            } else {
                Err(PlatformError::UnsupportedDistribution(distribution_id(
                    &release,
                )))
            }
        }
        other => Err(PlatformError::UnsupportedOs(other.to_string())),
    }
}

/// Map the compile-time target OS onto `uname -s` naming.
fn kernel_name() -> &'static str {
    match std::env::consts::OS {
        "macos" => "Darwin",
        "linux" => "Linux",
        other => other,
    }
}

fn read_release(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}

/// Extract the `ID=` value from os-release content for error messages.
fn distribution_id(release: &str) -> String {
    release
        .lines()
        .find_map(|line| line.strip_prefix("id="))
        .map(|id| id.trim_matches('"').to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
