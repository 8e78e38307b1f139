//! Key-value store abstraction.
//!
//! This module defines the [`KeyValueStore`] trait the session and migration
//! engine persist through. It mirrors a browser extension's local storage
//! area: the whole key space can be read at once, a set of keys can be merged
//! in, and keys can be removed.
//!
//! # Design Philosophy
//!
//! The trait stays minimal and maps directly to what the core needs. Methods
//! return boxed futures so implementations may be backed by a real async
//! service; the in-crate implementations resolve immediately.

use crate::domain::error::Result;
use crate::domain::schema::RawData;
use futures_util::future::BoxFuture;

/// Abstraction over persistent key-value backends.
///
/// Implementations take `&self` and handle their own interior mutability, the
/// same way a shared storage service would. Callers serialize their writes;
/// no compare-and-swap is offered.
///
/// # Implementations
///
/// - [`MemoryStore`](crate::storage::MemoryStore): shared in-memory map
/// - [`JsonFileStore`](crate::storage::JsonFileStore): single JSON file with atomic writes
pub trait KeyValueStore: Send + Sync {
    /// Reads the entire key space.
    ///
    /// An empty store yields an empty map.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_all(&self) -> BoxFuture<'_, Result<RawData>>;

    /// Merges `items` into the store, overwriting keys that already exist.
    ///
    /// Keys not mentioned in `items` are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. Some backends may have applied part
    /// of the write before failing.
    fn set_all(&self, items: RawData) -> BoxFuture<'_, Result<()>>;

    /// Removes a single key. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove_key<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Removes several keys. Missing keys are skipped.
    ///
    /// The default removes one key at a time; backends that rewrite all their
    /// data per write should override it with a single write.
    ///
    /// # Errors
    ///
    /// Returns the first write error. Keys before it may already be gone.
    fn remove_keys<'a>(&'a self, keys: &'a [String]) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            for key in keys {
                self.remove_key(key).await?;
            }
            Ok(())
        })
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_all(&self) -> BoxFuture<'_, Result<RawData>> {
        (**self).get_all()
    }

    fn set_all(&self, items: RawData) -> BoxFuture<'_, Result<()>> {
        (**self).set_all(items)
    }

    fn remove_key<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        (**self).remove_key(key)
    }

    fn remove_keys<'a>(&'a self, keys: &'a [String]) -> BoxFuture<'a, Result<()>> {
        (**self).remove_keys(keys)
    }
}
