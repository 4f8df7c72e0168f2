//! Logging infrastructure for structured console and file output.

mod logger;
#[cfg(any(test, feature = "test-support"))]
mod memory;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
#[cfg(any(test, feature = "test-support"))]
pub use memory::{Level, MemoryLog};
pub use subscriber::{LogFile, init_subscriber};
pub use types::{Log, StepEntry};

/// Serializes environment manipulation (`XDG_CACHE_HOME`, `COLUMNS`) across
/// parallel test threads.
#[cfg(test)]
pub(crate) static TEST_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Create a [`Logger`] backed by an isolated per-thread subscriber whose file
/// layer writes into an already opened `test.log` inside the returned
/// temporary directory.
///
/// Keep the returned guard alive for the duration of the test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let log_file = LogFile::in_dir(tmp.path());
    assert!(log_file.open("test"), "failed to open log file");
    let subscriber =
        tracing_subscriber::registry().with(log_file.layer().with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (Logger::new(log_file), tmp, guard)
}
