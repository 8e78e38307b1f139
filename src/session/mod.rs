//! Load/save session owning the live storage state.
//!
//! A [`Session`] is created by [`Session::load`], which reads the store,
//! migrates what it finds, and keeps the result as the live state. Holding a
//! `Session` therefore means the state is ready; there is no way to mutate
//! before loading.
//!
//! Every mutation method applies the matching [`crate::ops`] function and then
//! writes the full state back to the store (write-through, no batching). A
//! failed write is returned to the caller; the in-memory state keeps the
//! change and the next successful write persists it.
//!
//! # Example
//!
//! ```no_run
//! use tabstash::session::Session;
//! use tabstash::storage::MemoryStore;
//!
//! # async fn demo() -> tabstash::Result<()> {
//! let mut session = Session::load(MemoryStore::new()).await?;
//! session.create_group("Work").await?;
//! session.move_group_to_folder("Work", "Projects").await?;
//! assert_eq!(session.state().folder_of("Work"), Some("Projects"));
//! # Ok(())
//! # }
//! ```

use crate::domain::error::Result;
use crate::domain::schema::SchemaVersion;
use crate::domain::state::StorageState;
use crate::domain::tab::Tab;
use crate::migration::migrate_and_persist;
use crate::ops;
use crate::storage::KeyValueStore;
use tracing::Instrument;

/// An open view of the store with its migrated, live state.
///
/// Mutations take `&mut self`, so two mutations can never run against the
/// same session at once.
#[derive(Debug)]
pub struct Session<S> {
    store: S,
    state: StorageState,
    loaded_from: SchemaVersion,
}

impl<S: KeyValueStore> Session<S> {
    /// Reads and migrates the store, returning a ready session.
    ///
    /// If the stored data needed migrating, the migrated state has already
    /// been written back when this returns. The session keeps the migrated
    /// state in memory instead of re-reading the store.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the store or writing migrated data fails.
    pub async fn load(store: S) -> Result<Self> {
        let span = tracing::debug_span!("session_load");
        Self::load_inner(store).instrument(span).await
    }

    async fn load_inner(store: S) -> Result<Self> {
        let raw = store.get_all().await?;
        let migration = migrate_and_persist(&store, &raw).await?;

        let violations = migration.state.violations();
        if let Some(first) = violations.first() {
            tracing::warn!(
                count = violations.len(),
                first = %first,
                "loaded state breaks storage invariants"
            );
        }

        tracing::debug!(
            from_version = migration.from.number(),
            migrated = migration.changed,
            groups = migration.state.groups.len(),
            folders = migration.state.folders.len(),
            "session loaded"
        );

        Ok(Self {
            store,
            state: migration.state,
            loaded_from: migration.from,
        })
    }

    /// The live state.
    #[must_use]
    pub fn state(&self) -> &StorageState {
        &self.state
    }

    /// Schema version the store held when the session was loaded.
    #[must_use]
    pub fn loaded_from(&self) -> SchemaVersion {
        self.loaded_from
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ends the session and hands back the store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Writes the whole live state to the store, unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn save(&self) -> Result<()> {
        tracing::trace!(
            groups = self.state.groups.len(),
            folders = self.state.folders.len(),
            "saving session state"
        );
        self.store.set_all(self.state.to_raw()?).await
    }

    async fn save_if(&self, changed: bool) -> Result<bool> {
        if changed {
            self.save().await?;
        }
        Ok(changed)
    }

    /// Creates an empty group and persists it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or taken name (nothing is
    /// written), or a storage error if the write fails.
    pub async fn create_group(&mut self, name: &str) -> Result<()> {
        ops::create_group(&mut self.state, name)?;
        self.save().await
    }

    /// Creates an empty folder and persists it.
    ///
    /// # Errors
    ///
    /// Same contract as [`create_group`](Self::create_group).
    pub async fn create_folder(&mut self, name: &str) -> Result<()> {
        ops::create_folder(&mut self.state, name)?;
        self.save().await
    }

    /// Deletes a group and sweeps it out of every folder.
    ///
    /// Asking the user for confirmation is the caller's job. Returns whether
    /// anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn delete_group(&mut self, name: &str) -> Result<bool> {
        let changed = ops::delete_group(&mut self.state, name);
        self.save_if(changed).await
    }

    /// Deletes a folder, leaving its groups unassigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn delete_folder(&mut self, name: &str) -> Result<bool> {
        let changed = ops::delete_folder(&mut self.state, name);
        self.save_if(changed).await
    }

    /// Moves a group into a folder, out of any other.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn move_group_to_folder(&mut self, group: &str, folder: &str) -> Result<bool> {
        let changed = ops::move_group_to_folder(&mut self.state, group, folder);
        self.save_if(changed).await
    }

    /// Takes a group out of a folder, keeping the group.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn remove_group_from_folder(&mut self, group: &str, folder: &str) -> Result<bool> {
        let changed = ops::remove_group_from_folder(&mut self.state, group, folder);
        self.save_if(changed).await
    }

    /// Adds a tab to a group unless its url is already there.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn add_tab(&mut self, group: &str, tab: Tab) -> Result<bool> {
        let changed = ops::add_tab(&mut self.state, group, tab);
        self.save_if(changed).await
    }

    /// Removes the first tab with this url from a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn remove_tab(&mut self, group: &str, url: &str) -> Result<bool> {
        let changed = ops::remove_tab(&mut self.state, group, url);
        self.save_if(changed).await
    }

    /// Replaces a group's tabs, creating the group if needed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, or a storage error if
    /// the write fails.
    pub async fn replace_group_tabs<I>(&mut self, name: &str, tabs: I) -> Result<()>
    where
        I: IntoIterator<Item = Tab>,
    {
        ops::replace_group_tabs(&mut self.state, name, tabs)?;
        self.save().await
    }
}
