// Logging setup plus conditional macros - the macros are only active in debug builds

use std::fs::{self, File};
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

/// Map the number of `-v` flags to a default filter level.
#[must_use]
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger.
///
/// `RUST_LOG` wins over `verbosity`. When `log_file` is given, records go to
/// that file instead of stderr so a full-screen terminal UI is not disturbed.
/// Failing to open the file falls back to stderr.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>) {
    let default_level = level_for_verbosity(verbosity).to_string().to_lowercase();
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match File::create(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Could not open log file '{}': {e}", path.display()),
        }
    }

    // A second init (e.g. from tests) is harmless.
    let _ = builder.try_init();
}
