//! Root storage aggregate and its cross-entity invariants.
//!
//! [`StorageState`] is the whole persisted model: every group with its tabs and
//! every folder with the names of the groups it holds. Both mappings are keyed
//! by name and kept in a `BTreeMap`, so listings come out sorted.

use super::tab::Tab;
use crate::domain::schema::{RawData, FOLDERS_KEY, GROUPS_KEY};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Ordered tabs of one group.
pub type Group = Vec<Tab>;

/// Group names held by one folder.
pub type Folder = Vec<String>;

/// The current-schema state of the whole store.
///
/// # Invariants
///
/// After every mutation made through [`crate::ops`]:
///
/// - every group name listed in a folder exists in `groups`
/// - a group name appears in at most one folder
/// - urls are unique within a group
///
/// Tabs are always structured [`Tab`] values; the type cannot hold a bare URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageState {
    #[serde(default)]
    pub groups: BTreeMap<String, Group>,

    #[serde(default)]
    pub folders: BTreeMap<String, Folder>,
}

/// A broken invariant found by [`StorageState::violations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A folder lists a group that does not exist.
    DanglingGroup { folder: String, group: String },

    /// A group is listed by more than one folder (or twice by one).
    SharedGroup { group: String, folders: Vec<String> },

    /// A group holds the same url more than once.
    DuplicateUrl { group: String, url: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingGroup { folder, group } => {
                write!(f, "folder \"{folder}\" references missing group \"{group}\"")
            }
            Self::SharedGroup { group, folders } => {
                write!(f, "group \"{group}\" is listed {} times: {}", folders.len(), folders.join(", "))
            }
            Self::DuplicateUrl { group, url } => {
                write!(f, "group \"{group}\" contains \"{url}\" more than once")
            }
        }
    }
}

impl StorageState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes the state as the raw key-value shape written to the store.
    ///
    /// The result always carries both the `groups` and `folders` keys, which is
    /// what marks persisted data as non-legacy.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, which cannot happen for the
    /// string-only data held here.
    pub fn to_raw(&self) -> crate::Result<RawData> {
        let mut raw = RawData::new();
        raw.insert(GROUPS_KEY.to_string(), serde_json::to_value(&self.groups)?);
        raw.insert(FOLDERS_KEY.to_string(), serde_json::to_value(&self.folders)?);
        Ok(raw)
    }

    /// Returns the folder that currently holds `group`, if any.
    #[must_use]
    pub fn folder_of(&self, group: &str) -> Option<&str> {
        self.folders
            .iter()
            .find(|(_, members)| members.iter().any(|g| g == group))
            .map(|(name, _)| name.as_str())
    }

    /// Lists every broken invariant, in a stable order.
    ///
    /// Migrated data is copied as stored, so a state loaded from a hand-edited
    /// or partially written store may report violations until it is repaired
    /// through the mutation API.
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        let mut found = Vec::new();

        let mut holders: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (folder, members) in &self.folders {
            for group in members {
                if !self.groups.contains_key(group) {
                    found.push(Violation::DanglingGroup {
                        folder: folder.clone(),
                        group: group.clone(),
                    });
                }
                holders.entry(group.as_str()).or_default().push(folder.clone());
            }
        }
        for (group, folders) in holders {
            if folders.len() > 1 {
                found.push(Violation::SharedGroup {
                    group: group.to_string(),
                    folders,
                });
            }
        }

        for (group, tabs) in &self.groups {
            let mut seen = HashSet::new();
            for tab in tabs {
                if !seen.insert(tab.url.as_str()) {
                    found.push(Violation::DuplicateUrl {
                        group: group.clone(),
                        url: tab.url.clone(),
                    });
                }
            }
        }

        found
    }

    /// Returns `true` when [`violations`](Self::violations) is empty.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.violations().is_empty()
    }
}
