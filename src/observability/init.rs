//! Tracing initialization and subscriber setup.
//!
//! Wires `tracing` macros to a log file: an `EnvFilter` picks the level and a
//! plain-text fmt layer writes through a [`RotatingFileWriter`].

use super::file_writer::RotatingFileWriter;
use crate::Config;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor the config sets one.
const DEFAULT_LEVEL: &str = "info";

/// Installs the global tracing subscriber.
///
/// # Level Resolution
///
/// 1. `RUST_LOG`, if set and valid
/// 2. `config.trace_level`
/// 3. `"info"`
///
/// # File Location
///
/// Logs go to `config.log_path()`, by default
/// `tabstash.log` in the platform data directory, rotated at 5 MB with three backups.
///
/// # Initialization Behavior
///
/// - Creates the log directory if it doesn't exist
/// - Silently does nothing if the directory cannot be created; logging is optional
/// - Only the first call takes effect; later calls are ignored
pub fn init_tracing(config: &Config) {
    let log_path = config.log_path();
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL))
    });

    let writer = Mutex::new(RotatingFileWriter::new(log_path));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
