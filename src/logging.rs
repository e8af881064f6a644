//! Tracing subscriber setup: stdout, optionally mirrored to daily log files.

use std::{env, sync::OnceLock};

use tracing_appender::{
    non_blocking,
    non_blocking::NonBlocking,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{fmt, time::ChronoLocal, writer::MakeWriterExt},
};

/// Keeps the file writer flushing until the process exits.
static LOG_GUARD: OnceLock<non_blocking::WorkerGuard> = OnceLock::new();

const LOG_FILE_PREFIX: &str = "bigmatch.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// `LOG_FORMAT`, `LOG_DIR` and `LOG_MAX_FILES`, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogSettings {
    pub format: LogFormat,
    pub dir: Option<String>,
    pub max_files: Option<usize>,
}

impl LogSettings {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        let dir = lookup("LOG_DIR").filter(|v| !v.trim().is_empty());
        let max_files = lookup("LOG_MAX_FILES")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0);

        Self {
            format,
            dir,
            max_files,
        }
    }
}

pub fn init() {
    let settings = LogSettings::from_lookup(|key| env::var(key).ok());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(false)
        .with_level(true);

    let file_writer = settings
        .dir
        .as_deref()
        .and_then(|dir| init_file_writer(dir, settings.max_files));
    let stdout = std::io::stdout.with_max_level(tracing::Level::INFO);

    match (settings.format, file_writer) {
        (LogFormat::Text, Some(file)) => builder
            .with_ansi(false)
            .with_writer(stdout.and(file))
            .init(),
        (LogFormat::Text, None) => builder.with_ansi(true).init(),
        (LogFormat::Json, Some(file)) => builder.json().with_writer(stdout.and(file)).init(),
        (LogFormat::Json, None) => builder.json().init(),
    }

    tracing::info!(format = ?settings.format, file = settings.dir.is_some(), "📝 Logger initialized");
}

fn init_file_writer(dir: &str, max_files: Option<usize>) -> Option<NonBlocking> {
    let mut file_builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX);

    if let Some(n) = max_files {
        file_builder = file_builder.max_log_files(n);
    }

    // No subscriber yet: stderr is the only sink.
    let file_appender = match file_builder.build(dir) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("failed to create log file in {dir}: {e}");
            return None;
        }
    };

    let (file_writer, guard) = non_blocking(file_appender);
    if LOG_GUARD.set(guard).is_err() {
        eprintln!("logger already initialized, file output disabled");
        return None;
    }

    Some(file_writer)
}
