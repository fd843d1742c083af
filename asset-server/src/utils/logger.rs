//! Logging Infrastructure
//!
//! Structured logging setup for development (human readable) and production
//! (JSON) environments.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger with defaults (info, plain text, stdout)
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional file output
///
/// `RUST_LOG` takes precedence over `log_level`. When `log_dir` is given the
/// output goes to a daily rolling file there instead of stdout.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = log_dir.and_then(|dir| {
        let log_path = Path::new(dir);
        match std::fs::create_dir_all(log_path) {
            Ok(()) => Some(tracing_appender::rolling::daily(log_path, "asset-server")),
            Err(e) => {
                eprintln!("Cannot create log directory {dir}: {e}; logging to stdout");
                None
            }
        }
    });

    // Err only when a global subscriber is already installed
    let _ = match (json, file_appender) {
        (true, Some(appender)) => subscriber.json().with_writer(appender).try_init(),
        (true, None) => subscriber.json().try_init(),
        (false, Some(appender)) => subscriber.with_ansi(false).with_writer(appender).try_init(),
        (false, None) => subscriber.try_init(),
    };
}
