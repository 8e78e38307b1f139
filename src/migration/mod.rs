//! Migration engine for persisted tab data.
//!
//! Stored data may be in any of the shapes described in
//! [`crate::domain::schema`]. This module upgrades it to the current schema and
//! writes the upgraded form back, so every load heals the store.
//!
//! # Modules
//!
//! - [`engine`]: Pure version dispatch and per-version migration steps
//!
//! Adding a schema version means adding a
//! [`SchemaVersion`](crate::domain::SchemaVersion) variant, teaching
//! [`detect_version`](crate::domain::detect_version) to recognize it, and
//! adding a step to [`migrate_from`].

pub mod engine;

pub use engine::{migrate, migrate_from, Migration};

use crate::domain::error::Result;
use crate::domain::schema::RawData;
use crate::storage::KeyValueStore;

/// Migrates `raw` and persists the result if anything changed.
///
/// When the data was upgraded, the full migrated state is written with
/// `set_all` before returning. Stale legacy keys are then removed in one
/// `remove_keys` call so the store holds only the current layout. A cleanup
/// interrupted by a failed write is finished by the next load, which finds
/// the leftover keys beside the current layout. Current-schema data without
/// leftovers causes no writes.
///
/// # Errors
///
/// Returns an error if a store write fails. Migration itself cannot fail.
pub async fn migrate_and_persist<S>(store: &S, raw: &RawData) -> Result<Migration>
where
    S: KeyValueStore + ?Sized,
{
    let migration = migrate(raw);

    if migration.changed {
        tracing::info!(
            from_version = migration.from.number(),
            groups = migration.state.groups.len(),
            "persisting migrated storage"
        );
        store.set_all(migration.state.to_raw()?).await?;
    }

    if !migration.legacy_keys.is_empty() {
        tracing::debug!(
            count = migration.legacy_keys.len(),
            keys = ?migration.legacy_keys,
            "removing stale legacy keys"
        );
        store.remove_keys(&migration.legacy_keys).await?;
    }

    Ok(migration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::TabstashError;
    use crate::domain::schema::SchemaVersion;
    use crate::storage::MemoryStore;
    use futures_util::future::BoxFuture;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn legacy_store_is_rewritten_in_place() {
        let store = MemoryStore::with_data(json!({"work": ["http://a"], "prefs": {"x": 1}}));
        let raw = store.get_all().await.unwrap();

        let migration = migrate_and_persist(&store, &raw).await.unwrap();

        assert!(migration.changed);
        assert_eq!(
            serde_json::Value::Object(store.snapshot()),
            json!({
                "groups": {"work": [{"title": "http://a", "url": "http://a"}]},
                "folders": {},
                "prefs": {"x": 1},
            })
        );
    }

    #[tokio::test]
    async fn current_store_is_not_written() {
        let store = MemoryStore::with_data(json!({"groups": {}, "folders": {}}));
        let raw = store.get_all().await.unwrap();

        let migration = migrate_and_persist(&store, &raw).await.unwrap();

        assert!(!migration.changed);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn intermediate_store_is_healed_with_one_write() {
        let store = MemoryStore::with_data(json!({"groups": {"g": ["http://a"]}, "folders": {}}));
        let raw = store.get_all().await.unwrap();

        let migration = migrate_and_persist(&store, &raw).await.unwrap();

        assert_eq!(migration.from, SchemaVersion::Intermediate);
        assert_eq!(store.write_count(), 1);
        assert_eq!(
            store.snapshot()["groups"]["g"],
            json!([{"title": "http://a", "url": "http://a"}])
        );
    }

    #[tokio::test]
    async fn legacy_keys_are_removed_in_one_write() {
        let store = MemoryStore::with_data(json!({"a": ["http://a"], "b": [], "c": ["http://c"]}));
        let raw = store.get_all().await.unwrap();

        migrate_and_persist(&store, &raw).await.unwrap();

        assert_eq!(store.write_count(), 2);
        assert_eq!(store.snapshot().len(), 2);
    }

    /// Fails the first `remove_keys` call, then behaves normally.
    struct FlakyRemoval {
        inner: MemoryStore,
        failed: AtomicBool,
    }

    impl KeyValueStore for FlakyRemoval {
        fn get_all(&self) -> BoxFuture<'_, Result<RawData>> {
            self.inner.get_all()
        }

        fn set_all(&self, items: RawData) -> BoxFuture<'_, Result<()>> {
            self.inner.set_all(items)
        }

        fn remove_key<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
            self.inner.remove_key(key)
        }

        fn remove_keys<'a>(&'a self, keys: &'a [String]) -> BoxFuture<'a, Result<()>> {
            if self.failed.swap(true, Ordering::SeqCst) {
                self.inner.remove_keys(keys)
            } else {
                Box::pin(std::future::ready(Err(TabstashError::Storage(
                    "removal rejected".to_string(),
                ))))
            }
        }
    }

    #[tokio::test]
    async fn interrupted_legacy_cleanup_finishes_on_next_load() {
        let store = FlakyRemoval {
            inner: MemoryStore::with_data(json!({"work": ["http://a"], "prefs": {"x": 1}})),
            failed: AtomicBool::new(false),
        };

        let raw = store.get_all().await.unwrap();
        assert!(migrate_and_persist(&store, &raw).await.is_err());
        assert!(store.inner.snapshot().contains_key("work"));

        let raw = store.get_all().await.unwrap();
        let migration = migrate_and_persist(&store, &raw).await.unwrap();

        assert_eq!(migration.from, SchemaVersion::Current);
        assert!(!migration.changed);
        assert_eq!(
            serde_json::Value::Object(store.inner.snapshot()),
            json!({
                "groups": {"work": [{"title": "http://a", "url": "http://a"}]},
                "folders": {},
                "prefs": {"x": 1},
            })
        );

        let raw = store.get_all().await.unwrap();
        let writes = store.inner.write_count();
        migrate_and_persist(&store, &raw).await.unwrap();
        assert_eq!(store.inner.write_count(), writes);
    }

    #[tokio::test]
    async fn write_failure_is_reported() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);

        let result = migrate_and_persist(&store, &RawData::new()).await;

        assert!(result.is_err());
    }
}
