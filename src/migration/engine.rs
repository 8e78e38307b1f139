//! Schema migration steps.
//!
//! [`migrate`] turns whatever is in the store into a current-schema
//! [`StorageState`]. It never fails: unknown keys are ignored, malformed
//! values fall back to empty collections, and entries that are neither URL
//! strings nor tab objects are dropped.

use crate::domain::schema::{
    detect_version, needs_tab_rewrite, tab_from_value, RawData, SchemaVersion, FOLDERS_KEY,
    GROUPS_KEY,
};
use crate::domain::state::{Folder, Group, StorageState};
use serde_json::Value;

/// Result of migrating one snapshot of persisted data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// The current-schema state.
    pub state: StorageState,

    /// Whether the persisted data must be rewritten to match `state`.
    pub changed: bool,

    /// Schema version the data was read as.
    pub from: SchemaVersion,

    /// Top-level legacy keys made stale by the migrated state.
    ///
    /// For [`SchemaVersion::Legacy`] input these are the keys converted into
    /// groups. For grouped input they are leftover array keys named after an
    /// existing group, which an interrupted earlier migration failed to
    /// remove. Neither kind sets `changed`.
    pub legacy_keys: Vec<String>,
}

/// Migrates persisted data of any known version.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tabstash::domain::Tab;
/// use tabstash::migration::migrate;
///
/// let raw = json!({"work": ["http://a", "http://b"]});
/// let migration = migrate(raw.as_object().unwrap());
///
/// assert!(migration.changed);
/// assert_eq!(
///     migration.state.groups["work"],
///     vec![Tab::from_url("http://a"), Tab::from_url("http://b")]
/// );
/// assert!(migration.state.folders.is_empty());
/// ```
#[must_use]
pub fn migrate(raw: &RawData) -> Migration {
    migrate_from(raw, detect_version(raw))
}

/// Migrates persisted data read as a specific schema version.
///
/// `Intermediate` and `Current` share one step: each group is examined on its
/// own, so a store detected as current simply finds nothing to rewrite.
#[must_use]
pub fn migrate_from(raw: &RawData, version: SchemaVersion) -> Migration {
    let migration = match version {
        SchemaVersion::Legacy => from_legacy(raw),
        SchemaVersion::Intermediate | SchemaVersion::Current => from_grouped(raw, version),
    };

    tracing::debug!(
        from_version = version.number(),
        changed = migration.changed,
        groups = migration.state.groups.len(),
        folders = migration.state.folders.len(),
        "migration evaluated"
    );

    migration
}

/// v0: each array-valued top-level key is a group of URL strings.
fn from_legacy(raw: &RawData) -> Migration {
    let mut state = StorageState::new();
    let mut legacy_keys = Vec::new();

    for (key, value) in raw {
        let Some(entries) = value.as_array() else {
            tracing::trace!(key = %key, "ignoring non-group legacy key");
            continue;
        };
        state.groups.insert(key.clone(), coerce_tabs(entries));
        legacy_keys.push(key.clone());
    }

    Migration {
        state,
        changed: true,
        from: SchemaVersion::Legacy,
        legacy_keys,
    }
}

/// v1/v2: copy `groups` and `folders`, rewriting groups still holding URLs.
fn from_grouped(raw: &RawData, version: SchemaVersion) -> Migration {
    let mut state = StorageState::new();
    let mut changed = false;

    if let Some(groups) = raw.get(GROUPS_KEY).and_then(Value::as_object) {
        for (name, tabs) in groups {
            if needs_tab_rewrite(tabs) {
                tracing::debug!(group = %name, "rewriting bare URL entries");
                changed = true;
            }
            state.groups.insert(name.clone(), group_from_value(tabs));
        }
    }

    if let Some(folders) = raw.get(FOLDERS_KEY).and_then(Value::as_object) {
        for (name, members) in folders {
            state.folders.insert(name.clone(), folder_from_value(members));
        }
    }

    let legacy_keys = leftover_legacy_keys(raw, &state);

    Migration {
        state,
        changed,
        from: version,
        legacy_keys,
    }
}

/// Array-valued top-level keys that shadow a group of the same name.
fn leftover_legacy_keys(raw: &RawData, state: &StorageState) -> Vec<String> {
    raw.iter()
        .filter(|(key, value)| {
            key.as_str() != GROUPS_KEY
                && key.as_str() != FOLDERS_KEY
                && value.is_array()
                && state.groups.contains_key(key.as_str())
        })
        .map(|(key, _)| key.clone())
        .collect()
}

fn group_from_value(value: &Value) -> Group {
    value.as_array().map(|entries| coerce_tabs(entries)).unwrap_or_default()
}

fn coerce_tabs(entries: &[Value]) -> Group {
    entries.iter().filter_map(tab_from_value).collect()
}

fn folder_from_value(value: &Value) -> Folder {
    value
        .as_array()
        .map(|members| {
            members
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tab;
    use serde_json::json;

    fn raw(value: Value) -> RawData {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn legacy_ignores_non_array_keys() {
        let migration = migrate(&raw(json!({
            "work": ["http://a"],
            "settings": {"theme": "dark"},
            "count": 3,
        })));

        assert_eq!(migration.from, SchemaVersion::Legacy);
        assert_eq!(migration.state.groups.keys().collect::<Vec<_>>(), vec!["work"]);
        assert_eq!(migration.legacy_keys, vec!["work".to_string()]);
    }

    #[test]
    fn empty_input_is_a_changed_empty_state() {
        let migration = migrate(&RawData::new());
        assert!(migration.changed);
        assert_eq!(migration.state, StorageState::new());
        assert!(migration.legacy_keys.is_empty());
    }

    #[test]
    fn intermediate_rewrites_only_string_groups() {
        let migration = migrate(&raw(json!({
            "groups": {
                "new": [{"title": "Docs", "url": "https://docs.rs"}],
                "old": ["https://crates.io"],
                "empty": [],
            },
            "folders": {"F": ["new", "old"]},
        })));

        assert!(migration.changed);
        assert_eq!(migration.from, SchemaVersion::Intermediate);
        assert_eq!(migration.state.groups["new"], vec![Tab::new("Docs", "https://docs.rs")]);
        assert_eq!(migration.state.groups["old"], vec![Tab::from_url("https://crates.io")]);
        assert!(migration.state.groups["empty"].is_empty());
        assert_eq!(migration.state.folders["F"], vec!["new".to_string(), "old".to_string()]);
    }

    #[test]
    fn current_data_is_unchanged() {
        let migration = migrate(&raw(json!({
            "groups": {"g": [{"title": "A", "url": "https://a.test"}]},
            "folders": {},
        })));
        assert!(!migration.changed);
        assert_eq!(migration.from, SchemaVersion::Current);
    }

    #[test]
    fn missing_or_malformed_collections_default_to_empty() {
        let migration = migrate(&raw(json!({"folders": "oops"})));
        assert!(!migration.changed);
        assert_eq!(migration.state, StorageState::new());

        let migration = migrate(&raw(json!({"groups": {"g": "oops"}, "folders": {"F": [1, "g"]}})));
        assert!(migration.state.groups["g"].is_empty());
        assert_eq!(migration.state.folders["F"], vec!["g".to_string()]);
    }

    #[test]
    fn junk_tab_entries_are_dropped() {
        let migration = migrate(&raw(json!({
            "groups": {"g": ["https://a.test", 7, null, {"url": "https://b.test"}]},
        })));
        assert_eq!(
            migration.state.groups["g"],
            vec![Tab::from_url("https://a.test"), Tab::from_url("https://b.test")]
        );
    }

    #[test]
    fn grouped_data_reports_leftover_legacy_arrays() {
        let migration = migrate(&raw(json!({
            "groups": {"work": [{"title": "A", "url": "http://a"}]},
            "folders": {},
            "work": ["http://a"],
            "other": ["http://b"],
            "prefs": {"dark": true},
        })));

        assert!(!migration.changed);
        assert_eq!(migration.from, SchemaVersion::Current);
        assert_eq!(migration.legacy_keys, vec!["work".to_string()]);
        assert!(!migration.state.groups.contains_key("other"));
    }

    #[test]
    fn migrating_own_output_is_a_no_op() {
        let first = migrate(&raw(json!({"a": ["http://x", "http://y"], "b": []})));
        let second = migrate(&first.state.to_raw().unwrap());

        assert!(!second.changed);
        assert_eq!(second.state, first.state);
    }
}
