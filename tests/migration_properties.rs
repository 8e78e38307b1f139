//! Migration behavior across the stored layouts seen in the wild.

use serde_json::{json, Value};
use tabstash::domain::schema::{detect_version, RawData};
use tabstash::migration::{migrate, migrate_and_persist};
use tabstash::{KeyValueStore, MemoryStore, SchemaVersion, StorageState, Tab};

fn raw(value: Value) -> RawData {
    value.as_object().cloned().unwrap_or_default()
}

fn samples() -> Vec<RawData> {
    vec![
        RawData::new(),
        raw(json!({"work": ["http://a", "http://b"]})),
        raw(json!({"work": ["http://a"], "theme": "dark", "n": 1, "empty": []})),
        raw(json!({"groups": {}, "folders": {}})),
        raw(json!({"folders": {"F": ["ghost"]}})),
        raw(json!({
            "groups": {"old": ["http://a", "http://a"], "new": [{"title": "N", "url": "http://n"}]},
            "folders": {"F": ["old", "new"], "G": ["old"]},
        })),
        raw(json!({
            "groups": {"mixed": [{"url": "http://x"}, "http://y", 5]},
            "folders": "not an object",
        })),
    ]
}

#[test]
fn legacy_groups_become_tab_objects() {
    let migration = migrate(&raw(json!({"work": ["http://a", "http://b"]})));

    assert!(migration.changed);
    assert_eq!(
        migration.state.groups["work"],
        vec![Tab::new("http://a", "http://a"), Tab::new("http://b", "http://b")]
    );
    assert!(migration.state.folders.is_empty());
}

#[test]
fn migration_is_idempotent_for_every_sample() {
    for sample in samples() {
        let first = migrate(&sample);
        let second = migrate(&first.state.to_raw().unwrap());

        assert!(!second.changed, "re-migration changed {sample:?}");
        assert_eq!(second.state, first.state, "re-migration altered {sample:?}");
        assert_eq!(second.from, SchemaVersion::Current);
    }
}

#[test]
fn migrated_output_is_detected_as_current() {
    for sample in samples() {
        let state = migrate(&sample).state;
        assert_eq!(detect_version(&state.to_raw().unwrap()), SchemaVersion::Current);
    }
}

#[test]
fn intermediate_data_is_copied_as_stored() {
    let migration = migrate(&raw(json!({
        "groups": {"old": ["http://a", "http://a"]},
        "folders": {"F": ["old"], "G": ["old"]},
    })));

    assert!(migration.changed);
    assert_eq!(migration.state.groups["old"].len(), 2);
    assert_eq!(migration.state.violations().len(), 2);
}

#[tokio::test]
async fn fresh_install_writes_once() {
    let store = MemoryStore::new();
    let raw = store.get_all().await.unwrap();

    let migration = migrate_and_persist(&store, &raw).await.unwrap();

    assert_eq!(migration.state, StorageState::new());
    assert_eq!(store.write_count(), 1);
    assert_eq!(Value::Object(store.snapshot()), json!({"groups": {}, "folders": {}}));
}

#[tokio::test]
async fn legacy_keys_are_replaced_and_unrelated_keys_kept() {
    let store = MemoryStore::with_data(json!({
        "work": ["http://a"],
        "play": [],
        "prefs": {"dark": true},
    }));
    let raw = store.get_all().await.unwrap();

    migrate_and_persist(&store, &raw).await.unwrap();

    let stored = store.snapshot();
    assert!(!stored.contains_key("work"));
    assert!(!stored.contains_key("play"));
    assert_eq!(stored["prefs"], json!({"dark": true}));
    assert_eq!(
        stored["groups"],
        json!({"play": [], "work": [{"title": "http://a", "url": "http://a"}]})
    );

    let again = migrate_and_persist(&store, &store.snapshot()).await.unwrap();
    assert!(!again.changed);
}
