//! tabstash: persistent tab groups and folders over a key-value store.
//!
//! tabstash keeps saved browser tabs organized as:
//! - **Groups**: named, ordered lists of saved tabs (`{ title, url }`)
//! - **Folders**: named collections of group names, each group in at most one folder
//!
//! Everything is persisted in a key-value store shaped like a browser
//! extension's local storage. Older stored layouts are upgraded in place the
//! first time they are loaded.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Session (session/)                                 │  ← load → ready
//! │  - owns the live StorageState                       │  ← write-through
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Mutation API  │   │ Migration     │   │ Tab services  │
//! │ (ops/)        │   │ (migration/)  │   │ (tabs/)       │
//! │ - create/move │   │ - detect v0-2 │   │ - save open   │
//! │ - delete      │   │ - upgrade     │   │ - reopen      │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/) & Storage (storage/)              │
//! │  - Tab, StorageState, schema versions, errors       │
//! │  - KeyValueStore trait, memory & JSON file stores   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: Data model, schema detection, error types
//! - [`migration`]: Upgrades stored data to the current schema
//! - [`ops`]: Mutations and queries on the state
//! - [`session`]: Load/save session with write-through persistence
//! - [`storage`]: Key-value store trait and backends
//! - [`tabs`]: Open-tabs provider and tab opener collaborators
//! - [`infrastructure`]: Platform paths
//! - [`observability`]: Log file setup
//!
//! # Stored Layout
//!
//! ```json
//! {
//!   "groups":  { "work": [{ "title": "Docs", "url": "https://docs.rs" }] },
//!   "folders": { "Projects": ["work"] }
//! }
//! ```
//!
//! The legacy layout (one top-level key per group, holding URL strings) stays
//! readable forever and is rewritten into the layout above on load.
//!
//! # Configuration
//!
//! ```toml
//! data_dir = "~/.local/share/tabstash"
//! store_file = "tabstash.json"
//! trace_level = "debug"
//! log_file = "tabstash.log"
//! ```
//!
//! # Example
//!
//! ```rust
//! use tabstash::domain::StorageState;
//! use tabstash::migration::migrate;
//! use tabstash::ops;
//!
//! let legacy = serde_json::json!({"reading": ["https://example.com"]});
//! let mut state = migrate(legacy.as_object().unwrap()).state;
//!
//! ops::create_folder(&mut state, "Later")?;
//! ops::move_group_to_folder(&mut state, "reading", "Later");
//! assert_eq!(ops::unassigned_groups(&state), Vec::<&str>::new());
//! # Ok::<(), tabstash::TabstashError>(())
//! ```

pub mod domain;
pub mod infrastructure;
pub mod migration;
pub mod observability;
pub mod ops;
pub mod session;
pub mod storage;
pub mod tabs;

pub use domain::{Result, SchemaVersion, StorageState, Tab, TabstashError, ValidationError};
pub use session::Session;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default store file name inside the data directory.
pub const DEFAULT_STORE_FILE: &str = "tabstash.json";

/// Default log file name inside the data directory.
pub const DEFAULT_LOG_FILE: &str = "tabstash.log";

/// Runtime configuration.
///
/// Built from defaults, a string map (e.g. extension or CLI options) or a TOML
/// file. Paths starting with `~` are expanded against the home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the store and log files.
    ///
    /// Default: `$TABSTASH_DATA_DIR`, else the platform data directory plus
    /// `tabstash` (`~/.local/share/tabstash` on Linux).
    pub data_dir: PathBuf,

    /// Store file name, relative to `data_dir` unless absolute.
    pub store_file: String,

    /// Tracing level filter.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"info"`
    pub trace_level: Option<String>,

    /// Log file name, relative to `data_dir` unless absolute.
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: infrastructure::default_data_dir(),
            store_file: DEFAULT_STORE_FILE.to_string(),
            trace_level: None,
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

/// On-disk TOML form of [`Config`]; every key is optional.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    data_dir: Option<String>,
    store_file: Option<String>,
    trace_level: Option<String>,
    log_file: Option<String>,
}

impl Config {
    /// Parses configuration from a string map.
    ///
    /// Missing or empty values fall back to the defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use tabstash::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("data_dir".to_string(), "/srv/tabs".to_string());
    /// map.insert("trace_level".to_string(), "debug".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.store_path(), std::path::PathBuf::from("/srv/tabs/tabstash.json"));
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        Self::from_parts(ConfigFile {
            data_dir: get("data_dir"),
            store_file: get("store_file"),
            trace_level: get("trace_level"),
            log_file: get("log_file"),
        })
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`TabstashError::Config`] if the text is not valid TOML or a
    /// key has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text)
            .map_err(|e| TabstashError::Config(format!("failed to parse config TOML: {e}")))?;
        Ok(Self::from_parts(file))
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TabstashError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TabstashError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    fn from_parts(file: ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: file
                .data_dir
                .map_or(defaults.data_dir, |dir| infrastructure::expand_tilde(&dir)),
            store_file: file.store_file.unwrap_or(defaults.store_file),
            trace_level: file.trace_level,
            log_file: file.log_file.unwrap_or(defaults.log_file),
        }
    }

    /// Full path of the store file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(infrastructure::expand_tilde(&self.store_file))
    }

    /// Full path of the log file.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(infrastructure::expand_tilde(&self.log_file))
    }
}

/// Opens the JSON store named by `config` and loads a session from it.
///
/// # Errors
///
/// Returns an error if the store file cannot be opened or parsed, or if
/// writing migrated data fails.
pub async fn open(config: &Config) -> Result<Session<JsonFileStore>> {
    let path = config.store_path();
    tracing::debug!(path = ?path, "opening tabstash");

    let store = JsonFileStore::open(path)?;
    Session::load(store).await
}
