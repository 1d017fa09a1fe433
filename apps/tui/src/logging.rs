//! Tracing subscriber setup.
//!
//! The terminal UI owns stdout and stderr while it runs, so in that mode
//! events go to a log file. Headless runs log to stderr.
//!
//! Any `RUST_LOG` directive replaces the level chosen here; the level only
//! applies when `RUST_LOG` is unset or empty.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid log filter: {0}")]
    Filter(String),
    #[error("logging already initialized")]
    AlreadyInitialized,
}

pub const fn default_level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

fn filter(debug: bool) -> Result<EnvFilter, LoggingError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    filter_from(&rust_log, debug)
}

fn filter_from(rust_log: &str, debug: bool) -> Result<EnvFilter, LoggingError> {
    let directive = default_level(debug)
        .parse::<Directive>()
        .map_err(|e| LoggingError::Filter(e.to_string()))?;
    Ok(EnvFilter::builder()
        .with_default_directive(directive)
        .parse_lossy(rust_log))
}

/// Installs the global subscriber. Call once, before anything logs.
pub fn init_logging(target: LogTarget<'_>, debug: bool) -> Result<(), LoggingError> {
    let filter = filter(debug)?;

    let installed = match target {
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogTarget::Stderr => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    installed.map_err(|_| LoggingError::AlreadyInitialized)
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn debug_flag_raises_level() {
        assert_eq!(default_level(false), "info");
        assert_eq!(default_level(true), "debug");
    }

    #[test]
    fn rust_log_overrides_the_default_level() {
        let filter = filter_from("warn", false).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));

        let filter = filter_from("error", true).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn default_level_applies_without_rust_log() {
        let filter = filter_from("", false).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));

        let filter = filter_from("", true).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let missing = Path::new("/nonexistent-dir/for/study-radar.log");
        let error = open_log_file(missing).unwrap_err();
        assert!(error.to_string().contains("study-radar.log"));
    }
}
