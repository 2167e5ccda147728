//! Logging configuration and initialization
//!
//! This module sets up the tracing subscriber for structured logging. Every
//! event goes to the console and is appended to a log file.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Map a configured level name onto a tracing filter directive
///
/// Only the first word is used so trailing comments survive. Unknown values
/// fall back to "info".
pub fn normalize_level(log_level: &str) -> &'static str {
    let level = log_level
        .split_whitespace()
        .next()
        .unwrap_or("info")
        .to_lowercase();

    match level.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    }
}

/// Open `log_file` for appending, creating it and nothing else
///
/// A bare file name lands in the working directory.
pub fn open_log_file(log_file: &str) -> Result<RollingFileAppender> {
    let path = Path::new(log_file);
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .context("Log file path has no file name")?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(directory)
        .with_context(|| format!("Failed to open log file {}", log_file))
}

/// Initialize the logging system with console and file output
///
/// `RUST_LOG` overrides the configured level when set. The returned guard
/// flushes the file writer on drop and must be held for the life of the
/// process.
///
/// # Arguments
///
/// * `log_level` - The log level string (debug, info, warning, error, critical)
/// * `log_file` - Path of the log file; created if missing, appended otherwise
pub fn init_logging(log_level: &str, log_file: &str) -> Result<WorkerGuard> {
    let appender = open_log_file(log_file)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(normalize_level(log_level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_known_levels() {
        assert_eq!(normalize_level("debug"), "debug");
        assert_eq!(normalize_level("WARNING"), "warn");
        assert_eq!(normalize_level("critical"), "error");
    }

    #[test]
    fn test_normalize_strips_trailing_comment() {
        assert_eq!(normalize_level("error  # only failures"), "error");
    }

    #[test]
    fn test_normalize_unknown_falls_back_to_info() {
        assert_eq!(normalize_level("verbose"), "info");
        assert_eq!(normalize_level(""), "info");
    }

    #[test]
    fn test_open_log_file_creates_exact_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chatbot.log");

        let _appender = open_log_file(path.to_str().unwrap()).unwrap();

        assert!(path.is_file());
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_open_log_file_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bot.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        let mut appender = open_log_file(path.to_str().unwrap()).unwrap();
        appender.write_all(b"Attempt 1 for question: What is a nonce?...\n").unwrap();
        appender.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("earlier run\n"));
        assert!(content.contains("Attempt 1 for question"));
    }

    #[test]
    fn test_open_log_file_rejects_directory_path() {
        assert!(open_log_file("/").is_err());
    }
}
