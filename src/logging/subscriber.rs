//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::Level;
use tracing::field::{Field, Visit};

use super::utils::{
    default_log_dir, format_utc_datetime, format_utc_time, strip_ansi, terminal_columns,
};

/// Target used for stage headers so both layers can render them specially.
pub(super) const STAGE_TARGET: &str = "dotfiles::stage";

/// Pulls the `message` field out of a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl Visit for MessageExtractor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn message_of(event: &tracing::Event<'_>) -> String {
    let mut extractor = MessageExtractor::default();
    event.record(&mut extractor);
    extractor.message
}

/// Where file-bound lines currently go.
#[derive(Debug)]
enum FileSink {
    /// The file is not open yet; lines are held in memory.
    Pending(Vec<String>),
    /// Lines are appended to the open file.
    Open(fs::File),
    /// The file could not be created; lines are dropped.
    Unavailable,
}

#[derive(Debug)]
struct LogFileState {
    dir: Option<PathBuf>,
    sink: Mutex<FileSink>,
    path: OnceLock<PathBuf>,
}

/// The run's persistent log file, created on demand.
///
/// Until [`open`](Self::open) is called, events are buffered in memory and
/// nothing touches the disk, so a run that fails during setup leaves no
/// trace in the cache directory.  Opening truncates `<dir>/<command>.log`,
/// writes a run header and flushes the buffered lines.
#[derive(Debug, Clone)]
pub struct LogFile {
    state: Arc<LogFileState>,
}

impl Default for LogFile {
    fn default() -> Self {
        Self::with_dir(None)
    }
}

impl LogFile {
    /// A log file under `$XDG_CACHE_HOME/dotfiles/` (default
    /// `~/.cache/dotfiles/`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A log file under `dir`.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::with_dir(Some(dir.into()))
    }

    fn with_dir(dir: Option<PathBuf>) -> Self {
        Self {
            state: Arc::new(LogFileState {
                dir,
                sink: Mutex::new(FileSink::Pending(Vec::new())),
                path: OnceLock::new(),
            }),
        }
    }

    /// Create `<command>.log`, write the run header and flush buffered lines.
    ///
    /// Returns `false` if the directory or file cannot be created; later
    /// lines are then dropped.  Opening twice keeps the first file.
    #[must_use]
    pub fn open(&self, command: &str) -> bool {
        let Ok(mut sink) = self.state.sink.lock() else {
            return false;
        };
        if matches!(*sink, FileSink::Open(_)) {
            return true;
        }
        let pending = match std::mem::replace(&mut *sink, FileSink::Unavailable) {
            FileSink::Pending(lines) => lines,
            FileSink::Open(_) | FileSink::Unavailable => Vec::new(),
        };
        let dir = self.state.dir.clone().unwrap_or_else(default_log_dir);
        let path = dir.join(format!("{command}.log"));
        let Ok(file) = create_log(&path, &pending) else {
            return false;
        };
        *sink = FileSink::Open(file);
        drop(sink);
        let _ = self.state.path.set(path);
        true
    }

    /// Path of the open log file, if [`open`](Self::open) succeeded.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.state.path.get().map(PathBuf::as_path)
    }

    /// A tracing layer writing into this log file.
    pub(super) fn layer(&self) -> FileLayer {
        FileLayer {
            state: Arc::clone(&self.state),
        }
    }
}

fn create_log(path: &Path, pending: &[String]) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let version =
        option_env!("DOTFILES_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
    let mut file = fs::File::create(path)?;
    write!(
        file,
        "==========================================\n\
         Dotfiles installer {version} {}\n\
         ==========================================\n",
        format_utc_datetime(),
    )?;
    for line in pending {
        writeln!(file, "{line}")?;
    }
    Ok(file)
}

/// A [`tracing_subscriber::Layer`] that feeds every event to a [`LogFile`],
/// timestamped and with ANSI codes stripped.
///
/// Always receives `DEBUG` and above, whatever the console verbosity.
#[derive(Debug)]
pub(super) struct FileLayer {
    state: Arc<LogFileState>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let msg = strip_ansi(&message_of(event));
        let ts = format_utc_time();

        let line = match *metadata.level() {
            Level::INFO if metadata.target() == STAGE_TARGET => format!("[{ts}] ==> {msg}"),
            Level::ERROR => format!("[{ts}]     [error] {msg}"),
            Level::WARN => format!("[{ts}]     [warn] {msg}"),
            Level::DEBUG | Level::TRACE => format!("[{ts}]     [debug] {msg}"),
            Level::INFO => format!("[{ts}]     {msg}"),
        };

        if let Ok(mut sink) = self.state.sink.lock() {
            match &mut *sink {
                FileSink::Pending(lines) => lines.push(line),
                FileSink::Open(file) => {
                    writeln!(file, "{line}").ok();
                }
                FileSink::Unavailable => {}
            }
        }
    }
}

/// Console [`FormatEvent`](tracing_subscriber::fmt::FormatEvent) in the
/// installer's visual style.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let msg = message_of(event);

        match *metadata.level() {
            Level::ERROR => writeln!(writer, "  \x1b[31m✗\x1b[0m {msg}"),
            Level::WARN => writeln!(writer, "  \x1b[33m!\x1b[0m {msg}"),
            Level::INFO if metadata.target() == STAGE_TARGET => {
                let rule = "─".repeat(stage_rule_width(&msg, terminal_columns()));
                writeln!(
                    writer,
                    "\n\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m \x1b[2m{rule}\x1b[0m"
                )
            }
            Level::INFO => writeln!(writer, "  {msg}"),
            Level::DEBUG | Level::TRACE => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Width of the dim rule that follows a stage header, at most 60.
fn stage_rule_width(msg: &str, columns: usize) -> usize {
    const MAX_RULE: usize = 60;
    // "==> " + message + " "
    columns
        .saturating_sub(msg.chars().count() + 5)
        .min(MAX_RULE)
}

/// Initialise the global [`tracing`] subscriber.
///
/// The console layer prints `INFO` and above (`DEBUG` when `verbose`),
/// routing warnings and errors to stderr.  The file layer records everything
/// from `DEBUG` up into `log_file` once it has been opened.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, log_file: &LogFile) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = log_file.layer().with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
