//! JSON file-based key-value store.
//!
//! This module provides a human-readable store that keeps the whole key space
//! as one JSON object on disk. It uses atomic file writes (write-to-temp +
//! rename) so a crash never leaves a half-written file behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - the file is loaded into memory once, on open
//! - **Write**: O(n) - every write serializes the entire key space, so
//!   `remove_keys` drops a batch of keys in one rewrite
//! - **Best for**: a few thousand saved tabs, interactive write rates

use crate::domain::error::{Result, TabstashError};
use crate::domain::schema::RawData;
use crate::storage::backend::KeyValueStore;
use futures_util::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// JSON file store.
///
/// The file holds exactly what a browser's local storage area would: one
/// object whose top-level keys are the store's keys.
///
/// # File Format
///
/// ```json
/// {
///   "groups": {
///     "work": [{ "title": "Docs", "url": "https://docs.rs" }]
///   },
///   "folders": {
///     "Projects": ["work"]
///   }
/// }
/// ```
///
/// Legacy files (one top-level key per group, URL strings as entries) are
/// read unchanged; upgrading them is the migration engine's job.
#[derive(Debug)]
pub struct JsonFileStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy of the file, loaded on open.
    data: Mutex<RawData>,
}

impl JsonFileStore {
    /// Opens a JSON file store, creating parent directories as needed.
    ///
    /// A missing file is treated as an empty store and is only created on the
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but is not a JSON object
    /// - File permissions prevent reading
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON store");

        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no store file yet, starting empty");
            RawData::new()
        };

        tracing::debug!(keys = data.len(), "JSON store opened");

        Ok(Self {
            file_path,
            data: Mutex::new(data),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<RawData> {
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(RawData::new());
        }

        match serde_json::from_str::<serde_json::Value>(&contents)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(TabstashError::Storage(format!(
                "expected a JSON object in {}, found {}",
                path.display(),
                json_kind(&other)
            ))),
        }
    }

    /// Writes `data` to disk using write-to-temp + rename.
    fn save_to_file(&self, data: &RawData) -> Result<()> {
        tracing::debug!(path = ?self.file_path, keys = data.len(), "saving store file");

        let json = serde_json::to_string_pretty(data)?;
        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, RawData>> {
        self.data
            .lock()
            .map_err(|e| TabstashError::Storage(format!("JSON store poisoned: {e}")))
    }

    /// Applies `apply` to a copy of the data, persists it, then commits it to
    /// the in-memory cache. A failed write leaves the cache untouched.
    fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut RawData),
    {
        let mut cached = self.lock()?;
        let mut next = cached.clone();
        apply(&mut next);
        self.save_to_file(&next)?;
        *cached = next;
        drop(cached);
        Ok(())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_all(&self) -> BoxFuture<'_, Result<RawData>> {
        let _span = tracing::debug_span!("json_get_all").entered();

        let result = self.lock().map(|data| data.clone());
        if let Ok(data) = &result {
            tracing::debug!(keys = data.len(), "read store contents");
        }
        Box::pin(std::future::ready(result))
    }

    fn set_all(&self, items: RawData) -> BoxFuture<'_, Result<()>> {
        let _span = tracing::debug_span!("json_set_all", keys = items.len()).entered();

        let result = self.update(|data| data.extend(items));
        Box::pin(std::future::ready(result))
    }

    fn remove_key<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        let _span = tracing::debug_span!("json_remove_key", key = %key).entered();

        let result = match self.lock() {
            Ok(data) if !data.contains_key(key) => {
                tracing::trace!("key absent, skipping write");
                Ok(())
            }
            Ok(data) => {
                drop(data);
                self.update(|data| {
                    data.remove(key);
                })
            }
            Err(e) => Err(e),
        };
        Box::pin(std::future::ready(result))
    }

    fn remove_keys<'a>(&'a self, keys: &'a [String]) -> BoxFuture<'a, Result<()>> {
        let _span = tracing::debug_span!("json_remove_keys", count = keys.len()).entered();

        let result = match self.lock() {
            Ok(data) if !keys.iter().any(|key| data.contains_key(key)) => {
                tracing::trace!("no keys present, skipping write");
                Ok(())
            }
            Ok(data) => {
                drop(data);
                self.update(|data| {
                    for key in keys {
                        data.remove(key);
                    }
                })
            }
            Err(e) => Err(e),
        };
        Box::pin(std::future::ready(result))
    }
}
