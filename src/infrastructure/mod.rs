//! Infrastructure layer for filesystem and environment interactions.
//!
//! Currently this is path handling: where tabstash keeps its store and log
//! files, and how `~` in configured paths is resolved.

pub mod paths;

pub use paths::{default_data_dir, expand_tilde, expand_tilde_with, DATA_DIR_ENV};
