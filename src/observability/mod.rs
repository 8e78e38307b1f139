//! Logging for tabstash.
//!
//! The library itself only emits `tracing` events and spans: storage writes,
//! migrations and session loads are instrumented with structured fields
//! (counts, names, schema versions). Embedders may install their own
//! subscriber, or call [`init_tracing`] to log to a rotating file:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → RotatingFileWriter → tabstash.log
//! ```
//!
//! # Configuration
//!
//! Level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Size-rotated log file writer

pub mod file_writer;
mod init;

pub use file_writer::RotatingFileWriter;
pub use init::init_tracing;
