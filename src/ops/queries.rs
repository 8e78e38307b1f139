//! Read-only views over the storage state.
//!
//! Names come back sorted because both mappings are `BTreeMap`s.

use crate::domain::state::StorageState;
use crate::domain::tab::Tab;

/// All group names, sorted.
#[must_use]
pub fn group_names(state: &StorageState) -> Vec<&str> {
    state.groups.keys().map(String::as_str).collect()
}

/// All folder names, sorted.
#[must_use]
pub fn folder_names(state: &StorageState) -> Vec<&str> {
    state.folders.keys().map(String::as_str).collect()
}

/// Groups that no folder holds, sorted.
#[must_use]
pub fn unassigned_groups(state: &StorageState) -> Vec<&str> {
    state
        .groups
        .keys()
        .filter(|name| state.folder_of(name).is_none())
        .map(String::as_str)
        .collect()
}

/// Tabs of one group, or an empty slice if it does not exist.
#[must_use]
pub fn group_tabs<'a>(state: &'a StorageState, group: &str) -> &'a [Tab] {
    state.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
}

/// Every tab of every group in a folder, in folder order.
///
/// Names that do not resolve to a group are skipped.
#[must_use]
pub fn folder_tabs<'a>(state: &'a StorageState, folder: &str) -> Vec<&'a Tab> {
    state
        .folders
        .get(folder)
        .into_iter()
        .flatten()
        .flat_map(|group| group_tabs(state, group))
        .collect()
}
