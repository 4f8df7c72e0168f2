//! Helpers for log paths, ANSI stripping, terminal width and timestamps.
use std::path::PathBuf;

/// Strip ANSI escape sequences from a string.
///
/// CSI sequences (`ESC [` ... final byte in `@`..`~`) are removed whole; any
/// other escape drops only the byte that follows it.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next() == Some('[') {
            for inner in chars.by_ref() {
                if ('@'..='~').contains(&inner) {
                    break;
                }
            }
        }
    }
    out
}

/// Width of the attached terminal in columns.
///
/// Asks the terminal first, then `COLUMNS`, then settles on 80.
pub(super) fn terminal_columns() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| usize::from(w))
        .filter(|&n| n > 0)
        .or_else(columns_from_env)
        .unwrap_or(80)
}

fn columns_from_env() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&n| n > 0)
}

/// `$XDG_CACHE_HOME/dotfiles/` (default `~/.cache/dotfiles/`).
///
/// Only computes the path; the directory is created when the log file is
/// opened.
pub(super) fn default_log_dir() -> PathBuf {
    std::env::var_os("XDG_CACHE_HOME")
        .map_or_else(
            || {
                std::env::var_os("HOME")
                    .map_or_else(|| PathBuf::from("."), PathBuf::from)
                    .join(".cache")
            },
            PathBuf::from,
        )
        .join("dotfiles")
}

/// Current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::TEST_ENV_MUTEX;

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m hello"), "ERROR hello");
        assert_eq!(strip_ansi("no codes here"), "no codes here");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mInstalling\x1b[0m"),
            "==> Installing"
        );
    }

    #[test]
    fn strip_ansi_handles_cursor_sequences() {
        assert_eq!(strip_ansi("\x1b[2Kdone"), "done");
        assert_eq!(strip_ansi("\x1b7saved"), "saved");
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn terminal_columns_is_positive() {
        assert!(terminal_columns() > 0);
    }

    #[test]
    #[allow(unsafe_code)]
    fn columns_from_env_ignores_zero_and_garbage() {
        let _lock = TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        unsafe {
            std::env::set_var("COLUMNS", "0");
        }
        let zero = columns_from_env();
        unsafe {
            std::env::set_var("COLUMNS", "wide");
        }
        let garbage = columns_from_env();
        unsafe {
            std::env::set_var("COLUMNS", "132");
        }
        let set = columns_from_env();
        unsafe {
            std::env::remove_var("COLUMNS");
        }
        assert_eq!(zero, None);
        assert_eq!(garbage, None);
        assert_eq!(set, Some(132));
    }

    #[test]
    #[allow(unsafe_code)]
    fn default_log_dir_uses_xdg_cache_home_without_creating_it() {
        let tmp = tempfile::tempdir().unwrap();
        let _lock = TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", tmp.path());
        }
        let dir = default_log_dir();
        unsafe {
            std::env::remove_var("XDG_CACHE_HOME");
        }
        assert_eq!(dir, tmp.path().join("dotfiles"));
        assert!(!dir.exists());
    }

    #[test]
    fn timestamps_have_expected_shape() {
        let time = format_utc_time();
        assert_eq!(time.len(), 8);
        assert_eq!(&time[2..3], ":");
        let datetime = format_utc_datetime();
        assert_eq!(datetime.len(), 19);
        assert_eq!(&datetime[10..11], " ");
    }
}
