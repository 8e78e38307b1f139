//! Persisted schema versions and shape detection.
//!
//! Stored data arrives as an untyped JSON object ([`RawData`]). This module
//! classifies it into a [`SchemaVersion`] and provides the element-level checks
//! the migration engine builds on.
//!
//! # Versions
//!
//! | Version        | Top-level keys        | Tab entries                   |
//! |----------------|-----------------------|-------------------------------|
//! | `Legacy`       | one key per group     | bare URL strings              |
//! | `Intermediate` | `groups`, `folders`   | some groups still bare URLs   |
//! | `Current`      | `groups`, `folders`   | `{ "title", "url" }` objects  |

use super::tab::Tab;
use serde_json::Value;

/// Raw key-value contents of the store.
pub type RawData = serde_json::Map<String, Value>;

/// Top-level key holding the group mapping.
pub const GROUPS_KEY: &str = "groups";

/// Top-level key holding the folder mapping.
pub const FOLDERS_KEY: &str = "folders";

/// Shape of persisted data, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    /// v0: each top-level key is a group mapping to URL strings.
    Legacy,
    /// v1: `groups`/`folders` present, some groups still hold URL strings.
    Intermediate,
    /// v2: fully structured tabs.
    Current,
}

impl SchemaVersion {
    /// Numeric schema version as used in log output.
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::Legacy => 0,
            Self::Intermediate => 1,
            Self::Current => 2,
        }
    }
}

/// Returns `true` if `raw` has neither a `groups` nor a `folders` key.
///
/// An empty object counts as legacy: a fresh install is indistinguishable from
/// a v0 store with no groups.
#[must_use]
pub fn is_legacy_shape(raw: &RawData) -> bool {
    !raw.contains_key(GROUPS_KEY) && !raw.contains_key(FOLDERS_KEY)
}

/// Returns `true` if `value` is a structured tab object.
///
/// A tab object has a string `url` and, when present, a string `title`. Bare
/// strings are never tab objects.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tabstash::domain::schema::is_tab_object;
///
/// assert!(is_tab_object(&json!({"title": "A", "url": "https://a.test"})));
/// assert!(!is_tab_object(&json!("https://a.test")));
/// ```
#[must_use]
pub fn is_tab_object(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let url_ok = obj.get("url").is_some_and(Value::is_string);
    let title_ok = obj.get("title").map_or(true, Value::is_string);
    url_ok && title_ok
}

/// Returns `true` if a group's stored tab list still uses bare URL strings.
///
/// Only the first entry is inspected; a list is either fully legacy or fully
/// structured.
#[must_use]
pub fn needs_tab_rewrite(tabs: &Value) -> bool {
    tabs.as_array()
        .and_then(|entries| entries.first())
        .is_some_and(Value::is_string)
}

/// Classifies persisted data.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tabstash::domain::schema::{detect_version, SchemaVersion};
///
/// let raw = json!({"work": ["https://a.test"]});
/// assert_eq!(detect_version(raw.as_object().unwrap()), SchemaVersion::Legacy);
/// ```
#[must_use]
pub fn detect_version(raw: &RawData) -> SchemaVersion {
    if is_legacy_shape(raw) {
        return SchemaVersion::Legacy;
    }

    let has_bare_urls = raw
        .get(GROUPS_KEY)
        .and_then(Value::as_object)
        .is_some_and(|groups| groups.values().any(needs_tab_rewrite));

    if has_bare_urls {
        SchemaVersion::Intermediate
    } else {
        SchemaVersion::Current
    }
}

/// Coerces one stored tab entry into a [`Tab`].
///
/// Bare strings become `Tab { title: url, url }`; tab objects keep their title,
/// falling back to the URL when it is missing or empty. Anything else yields
/// `None` and is dropped by the caller.
#[must_use]
pub fn tab_from_value(value: &Value) -> Option<Tab> {
    match value {
        Value::String(url) => Some(Tab::from_url(url.as_str())),
        Value::Object(obj) if is_tab_object(value) => {
            let url = obj.get("url").and_then(Value::as_str)?;
            let title = obj.get("title").and_then(Value::as_str);
            Some(Tab::with_fallback_title(title, url))
        }
        _ => None,
    }
}
