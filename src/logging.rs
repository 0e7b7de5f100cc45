//! Log file setup
//!
//! The TUI owns the terminal, so diagnostics go to a file instead of stderr.
//! Everything in the crate logs through the `log` facade; this module wires
//! `env_logger` to that file once at startup.

use std::fs::OpenOptions;
use std::path::PathBuf;

/// Overrides the log file location
pub const LOG_PATH_ENV: &str = "MOVIEFINDER_LOG";

/// Default log file name, placed next to the executable
const LOG_FILE_NAME: &str = "moviefinder.log";

/// Get the log file path (env override, else same directory as executable)
pub fn log_path() -> PathBuf {
    if let Some(path) = std::env::var_os(LOG_PATH_ENV) {
        return PathBuf::from(path);
    }

    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}

/// Initialize the global logger.
///
/// Loads `.env` first, then takes the filter from `RUST_LOG` (default
/// `info`). The file is truncated on each run. If it cannot be opened,
/// logging falls back to stderr for CLI use.
pub fn init() -> Option<PathBuf> {
    // `.env` may set RUST_LOG or the log path
    let dotenv = crate::config::load_dotenv();

    let path = log_path();
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();

    let opened = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Start fresh each run
        .open(&path);

    let result = match opened {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            Some(path)
        }
        Err(e) => {
            eprintln!(
                "[moviefinder] Cannot open log file {}: {}",
                path.display(),
                e
            );
            None
        }
    };

    // A second init (tests, embedding) keeps the first logger
    let _ = builder.try_init();
    if let Err(e) = dotenv {
        log::warn!("Ignoring unreadable .env file: {}", e);
    }
    result
}
