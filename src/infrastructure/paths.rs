//! Path helpers for locating tabstash's data on the host.
//!
//! This module resolves the data directory and expands `~`-prefixed paths
//! from configuration.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TABSTASH_DATA_DIR";

const APP_DIR: &str = "tabstash";

/// Returns the default data directory.
///
/// Uses `$TABSTASH_DATA_DIR` when set, otherwise the platform data directory
/// (`~/.local/share/tabstash` on Linux, `~/Library/Application Support/tabstash`
/// on macOS, `%APPDATA%\tabstash` on Windows). Falls back to a relative
/// `tabstash` directory when the platform reports none.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_dir().map_or_else(|| PathBuf::from(APP_DIR), |dir| dir.join(APP_DIR))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths are returned unchanged when no home directory is known.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    match dirs::home_dir() {
        Some(home) => expand_tilde_with(path, &home),
        None => PathBuf::from(path),
    }
}

/// Expands a leading `~` against an explicit home directory.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use tabstash::infrastructure::expand_tilde_with;
///
/// let home = Path::new("/home/ada");
/// assert_eq!(expand_tilde_with("~/tabs", home), PathBuf::from("/home/ada/tabs"));
/// assert_eq!(expand_tilde_with("~", home), PathBuf::from("/home/ada"));
/// assert_eq!(expand_tilde_with("/srv/tabs", home), PathBuf::from("/srv/tabs"));
/// ```
#[must_use]
pub fn expand_tilde_with(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}
