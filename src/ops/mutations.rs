//! State-changing operations on groups, folders and tabs.
//!
//! Every function here takes the live [`StorageState`] and keeps the
//! cross-entity invariants intact. Functions that can reject their input
//! return `Result`; the others return `true` when they changed the state, so
//! the caller knows whether a write is due.
//!
//! Operations on entities that do not exist are silent no-ops.

use crate::domain::error::{EntityKind, Result, ValidationError};
use crate::domain::state::StorageState;
use crate::domain::tab::Tab;
use std::collections::HashSet;

/// Trims `name` and rejects it if nothing is left.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] for an empty or blank name.
pub fn validate_name(name: &str, kind: EntityKind) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName { kind }.into());
    }
    Ok(name)
}

/// Creates an empty group.
///
/// Surrounding whitespace is trimmed from `name`.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] for an empty name and
/// [`ValidationError::Duplicate`] if the group exists. The state is unchanged
/// on error.
///
/// # Examples
///
/// ```
/// use tabstash::domain::StorageState;
/// use tabstash::ops;
///
/// let mut state = StorageState::new();
/// ops::create_group(&mut state, "Work")?;
/// assert!(ops::create_group(&mut state, "Work").is_err());
/// assert_eq!(state.groups.len(), 1);
/// # Ok::<(), tabstash::TabstashError>(())
/// ```
pub fn create_group(state: &mut StorageState, name: &str) -> Result<()> {
    let name = validate_name(name, EntityKind::Group)?;
    if state.groups.contains_key(name) {
        return Err(ValidationError::Duplicate {
            kind: EntityKind::Group,
            name: name.to_string(),
        }
        .into());
    }

    state.groups.insert(name.to_string(), Vec::new());
    tracing::debug!(group = %name, "group created");
    Ok(())
}

/// Creates an empty folder.
///
/// # Errors
///
/// Same contract as [`create_group`], applied to folders.
pub fn create_folder(state: &mut StorageState, name: &str) -> Result<()> {
    let name = validate_name(name, EntityKind::Folder)?;
    if state.folders.contains_key(name) {
        return Err(ValidationError::Duplicate {
            kind: EntityKind::Folder,
            name: name.to_string(),
        }
        .into());
    }

    state.folders.insert(name.to_string(), Vec::new());
    tracing::debug!(folder = %name, "folder created");
    Ok(())
}

/// Deletes a group and removes its name from every folder.
///
/// Folders are swept even when the group itself is already gone, which also
/// clears references left behind by older data.
pub fn delete_group(state: &mut StorageState, name: &str) -> bool {
    let existed = state.groups.remove(name).is_some();
    let swept = sweep_from_folders(state, name);

    tracing::debug!(group = %name, existed, swept, "group deleted");
    existed || swept
}

/// Deletes a folder. Its groups stay and become unassigned.
pub fn delete_folder(state: &mut StorageState, name: &str) -> bool {
    let removed = state.folders.remove(name);
    if let Some(members) = &removed {
        tracing::debug!(folder = %name, unassigned = members.len(), "folder deleted");
    }
    removed.is_some()
}

/// Moves a group into a folder, taking it out of any other folder first.
///
/// The folder is created if needed and the group is appended at its end.
/// The folder name is trimmed like [`create_folder`] does; a blank folder
/// name is ignored, as are unknown groups, so a folder never lists a missing
/// group.
pub fn move_group_to_folder(state: &mut StorageState, group: &str, folder: &str) -> bool {
    let Ok(folder) = validate_name(folder, EntityKind::Folder) else {
        tracing::debug!(group = %group, "ignoring move into a blank folder name");
        return false;
    };
    if !state.groups.contains_key(group) {
        tracing::debug!(group = %group, folder = %folder, "ignoring move of unknown group");
        return false;
    }

    sweep_from_folders(state, group);

    let members = state.folders.entry(folder.to_string()).or_default();
    if !members.iter().any(|g| g == group) {
        members.push(group.to_string());
    }

    tracing::debug!(group = %group, folder = %folder, "group moved");
    true
}

/// Takes a group out of one folder without deleting it.
pub fn remove_group_from_folder(state: &mut StorageState, group: &str, folder: &str) -> bool {
    let Some(members) = state.folders.get_mut(folder) else {
        return false;
    };

    let before = members.len();
    members.retain(|g| g != group);
    let changed = members.len() != before;

    if changed {
        tracing::debug!(group = %group, folder = %folder, "group removed from folder");
    }
    changed
}

/// Appends a tab to a group.
///
/// Nothing happens if the group is missing, the url is empty, or the group
/// already holds a tab with the same url. An empty title is replaced by the
/// url.
pub fn add_tab(state: &mut StorageState, group: &str, tab: Tab) -> bool {
    let Some(tabs) = state.groups.get_mut(group) else {
        return false;
    };
    if tab.url.is_empty() || tabs.iter().any(|t| t.url == tab.url) {
        tracing::trace!(group = %group, url = %tab.url, "tab not added");
        return false;
    }

    let tab = Tab::with_fallback_title(Some(tab.title.as_str()), tab.url);
    tracing::debug!(group = %group, url = %tab.url, "tab added");
    tabs.push(tab);
    true
}

/// Removes the first tab with exactly this url from a group.
pub fn remove_tab(state: &mut StorageState, group: &str, url: &str) -> bool {
    let Some(tabs) = state.groups.get_mut(group) else {
        return false;
    };
    let Some(index) = tabs.iter().position(|t| t.url == url) else {
        return false;
    };

    tabs.remove(index);
    tracing::debug!(group = %group, url = %url, "tab removed");
    true
}

/// Replaces a group's tabs, creating the group if it does not exist.
///
/// Tabs with an empty url are skipped and repeated urls keep only their first
/// occurrence. Folder membership of an existing group is kept.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] for an empty name.
pub fn replace_group_tabs<I>(state: &mut StorageState, name: &str, tabs: I) -> Result<()>
where
    I: IntoIterator<Item = Tab>,
{
    let name = validate_name(name, EntityKind::Group)?;

    let mut seen = HashSet::new();
    let tabs: Vec<Tab> = tabs
        .into_iter()
        .filter(|tab| !tab.url.is_empty())
        .filter(|tab| seen.insert(tab.url.clone()))
        .map(|tab| Tab::with_fallback_title(Some(tab.title.as_str()), tab.url))
        .collect();

    tracing::debug!(group = %name, tab_count = tabs.len(), "group tabs replaced");
    state.groups.insert(name.to_string(), tabs);
    Ok(())
}

/// Removes `group` from every folder. Returns `true` if any folder changed.
fn sweep_from_folders(state: &mut StorageState, group: &str) -> bool {
    let mut changed = false;
    for members in state.folders.values_mut() {
        let before = members.len();
        members.retain(|g| g != group);
        changed |= members.len() != before;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TabstashError;

    fn state_with_groups(names: &[&str]) -> StorageState {
        let mut state = StorageState::new();
        for name in names {
            create_group(&mut state, name).unwrap();
        }
        state
    }

    #[test]
    fn create_group_rejects_empty_and_blank_names() {
        let mut state = StorageState::new();
        for name in ["", "   "] {
            let err = create_group(&mut state, name).unwrap_err();
            assert!(matches!(
                err,
                TabstashError::Validation(ValidationError::EmptyName { kind: EntityKind::Group })
            ));
        }
        assert_eq!(state, StorageState::new());
    }

    #[test]
    fn create_group_twice_keeps_one_entry() {
        let mut state = StorageState::new();
        create_group(&mut state, "Work").unwrap();
        let err = create_group(&mut state, " Work ").unwrap_err();

        assert!(err.is_validation());
        assert_eq!(state.groups.len(), 1);
    }

    #[test]
    fn create_folder_rejects_duplicates() {
        let mut state = StorageState::new();
        create_folder(&mut state, "F").unwrap();
        assert!(matches!(
            create_folder(&mut state, "F"),
            Err(TabstashError::Validation(ValidationError::Duplicate { .. }))
        ));
        assert!(state.folders["F"].is_empty());
    }

    #[test]
    fn moving_twice_leaves_group_only_in_last_folder() {
        let mut state = state_with_groups(&["g"]);
        assert!(move_group_to_folder(&mut state, "g", "F1"));
        assert!(move_group_to_folder(&mut state, "g", "F2"));

        assert!(state.folders["F1"].is_empty());
        assert_eq!(state.folders["F2"], vec!["g".to_string()]);
        assert!(state.is_consistent());
    }

    #[test]
    fn moving_into_same_folder_twice_lists_group_once() {
        let mut state = state_with_groups(&["g"]);
        move_group_to_folder(&mut state, "g", "F");
        move_group_to_folder(&mut state, "g", "F");
        assert_eq!(state.folders["F"], vec!["g".to_string()]);
    }

    #[test]
    fn moving_unknown_group_changes_nothing() {
        let mut state = StorageState::new();
        assert!(!move_group_to_folder(&mut state, "ghost", "F"));
        assert!(state.folders.is_empty());
    }

    #[test]
    fn move_trims_folder_name_and_ignores_blank_ones() {
        let mut state = state_with_groups(&["g"]);
        assert!(!move_group_to_folder(&mut state, "g", "   "));
        assert!(state.folders.is_empty());

        assert!(move_group_to_folder(&mut state, "g", " F "));
        assert_eq!(state.folders.keys().collect::<Vec<_>>(), vec!["F"]);
        assert_eq!(state.folder_of("g"), Some("F"));
    }

    #[test]
    fn delete_group_sweeps_every_folder() {
        let mut state = state_with_groups(&["g", "h"]);
        move_group_to_folder(&mut state, "g", "F1");
        move_group_to_folder(&mut state, "h", "F1");
        state.folders.entry("F2".to_string()).or_default().push("g".to_string());

        assert!(delete_group(&mut state, "g"));

        assert!(!state.groups.contains_key("g"));
        assert!(state.folders.values().all(|members| !members.iter().any(|m| m == "g")));
        assert_eq!(state.folders["F1"], vec!["h".to_string()]);
    }

    #[test]
    fn delete_missing_group_is_a_no_op() {
        let mut state = state_with_groups(&["g"]);
        assert!(!delete_group(&mut state, "nope"));
        assert_eq!(state.groups.len(), 1);
    }

    #[test]
    fn delete_folder_unassigns_groups() {
        let mut state = state_with_groups(&["g"]);
        move_group_to_folder(&mut state, "g", "F");

        assert!(delete_folder(&mut state, "F"));
        assert!(!delete_folder(&mut state, "F"));
        assert!(state.groups.contains_key("g"));
        assert_eq!(state.folder_of("g"), None);
    }

    #[test]
    fn remove_from_folder_touches_only_that_folder() {
        let mut state = state_with_groups(&["g"]);
        move_group_to_folder(&mut state, "g", "F");

        assert!(!remove_group_from_folder(&mut state, "g", "Other"));
        assert!(remove_group_from_folder(&mut state, "g", "F"));
        assert!(state.folders["F"].is_empty());
        assert!(state.groups.contains_key("g"));
    }

    #[test]
    fn duplicate_url_is_not_added() {
        let mut state = state_with_groups(&["g"]);
        assert!(add_tab(&mut state, "g", Tab::new("A", "https://a.test")));
        let before = state.groups["g"].clone();

        assert!(!add_tab(&mut state, "g", Tab::new("A again", "https://a.test")));
        assert_eq!(state.groups["g"], before);
    }

    #[test]
    fn add_tab_needs_group_and_url() {
        let mut state = state_with_groups(&["g"]);
        assert!(!add_tab(&mut state, "missing", Tab::from_url("https://a.test")));
        assert!(!add_tab(&mut state, "g", Tab::new("blank", "")));
        assert!(state.groups["g"].is_empty());
    }

    #[test]
    fn add_tab_fills_empty_title() {
        let mut state = state_with_groups(&["g"]);
        add_tab(&mut state, "g", Tab::new("", "https://a.test"));
        assert_eq!(state.groups["g"], vec![Tab::from_url("https://a.test")]);
    }

    #[test]
    fn remove_tab_drops_first_match_only() {
        let mut state = state_with_groups(&["g"]);
        state.groups.get_mut("g").unwrap().extend([
            Tab::new("one", "https://a.test"),
            Tab::new("two", "https://b.test"),
            Tab::new("three", "https://a.test"),
        ]);

        assert!(remove_tab(&mut state, "g", "https://a.test"));
        assert_eq!(
            state.groups["g"],
            vec![Tab::new("two", "https://b.test"), Tab::new("three", "https://a.test")]
        );
        assert!(!remove_tab(&mut state, "g", "https://c.test"));
    }

    #[test]
    fn replace_group_tabs_dedupes_and_keeps_folder() {
        let mut state = state_with_groups(&["g"]);
        move_group_to_folder(&mut state, "g", "F");

        replace_group_tabs(
            &mut state,
            "g",
            vec![
                Tab::new("A", "https://a.test"),
                Tab::new("", "https://b.test"),
                Tab::new("A dup", "https://a.test"),
                Tab::new("no url", ""),
            ],
        )
        .unwrap();

        assert_eq!(
            state.groups["g"],
            vec![Tab::new("A", "https://a.test"), Tab::from_url("https://b.test")]
        );
        assert_eq!(state.folder_of("g"), Some("F"));
    }

    #[test]
    fn replace_group_tabs_requires_name() {
        let mut state = StorageState::new();
        assert!(replace_group_tabs(&mut state, "", Vec::new()).is_err());
        assert!(state.groups.is_empty());
    }
}
