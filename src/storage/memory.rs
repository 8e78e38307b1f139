//! In-memory key-value store.
//!
//! [`MemoryStore`] keeps the key space in a shared map. Clones share the same
//! map, so a test can hand one clone to a session and inspect the other.

use crate::domain::error::{Result, TabstashError};
use crate::domain::schema::RawData;
use crate::storage::backend::KeyValueStore;
use futures_util::future::BoxFuture;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    data: RawData,
    writes: usize,
    fail_writes: bool,
}

/// Shared in-memory store.
///
/// Counts every successful write call and can be told to fail
/// writes, which makes persistence behavior observable from tests.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tabstash::storage::MemoryStore;
///
/// let store = MemoryStore::with_data(json!({"work": ["https://a.test"]}));
/// assert!(store.snapshot().contains_key("work"));
/// assert_eq!(store.write_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the keys of a JSON object.
    ///
    /// Non-object values seed an empty store.
    #[must_use]
    pub fn with_data(data: serde_json::Value) -> Self {
        let data = match data {
            serde_json::Value::Object(map) => map,
            _ => RawData::new(),
        };
        Self {
            inner: Arc::new(Mutex::new(Inner {
                data,
                ..Inner::default()
            })),
        }
    }

    /// Returns a copy of the current key space.
    #[must_use]
    pub fn snapshot(&self) -> RawData {
        self.lock().map(|inner| inner.data.clone()).unwrap_or_default()
    }

    /// Number of writes (`set_all`, `remove_key` and `remove_keys`) applied so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().map(|inner| inner.writes).unwrap_or(0)
    }

    /// Makes every following write fail with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.lock() {
            inner.fail_writes = fail;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| TabstashError::Storage(format!("memory store poisoned: {e}")))
    }

    fn write<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut RawData),
    {
        let mut inner = self.lock()?;
        if inner.fail_writes {
            return Err(TabstashError::Storage("memory store rejected write".to_string()));
        }
        apply(&mut inner.data);
        inner.writes += 1;
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get_all(&self) -> BoxFuture<'_, Result<RawData>> {
        let result = self.lock().map(|inner| inner.data.clone());
        Box::pin(std::future::ready(result))
    }

    fn set_all(&self, items: RawData) -> BoxFuture<'_, Result<()>> {
        let _span = tracing::trace_span!("memory_set_all", keys = items.len()).entered();

        let result = self.write(|data| data.extend(items));
        Box::pin(std::future::ready(result))
    }

    fn remove_key<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        let _span = tracing::trace_span!("memory_remove_key", key = %key).entered();

        let result = self.write(|data| {
            data.remove(key);
        });
        Box::pin(std::future::ready(result))
    }

    fn remove_keys<'a>(&'a self, keys: &'a [String]) -> BoxFuture<'a, Result<()>> {
        let _span = tracing::trace_span!("memory_remove_keys", count = keys.len()).entered();

        let result = self.write(|data| {
            for key in keys {
                data.remove(key);
            }
        });
        Box::pin(std::future::ready(result))
    }
}
