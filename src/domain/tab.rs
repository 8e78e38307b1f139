//! Saved tab model.
//!
//! A [`Tab`] is the unit stored inside a group: a display title plus the URL
//! that identifies it within that group.

use serde::{Deserialize, Serialize};

/// A saved browser tab.
///
/// `url` is the identity key inside a group; `title` is display-only and falls
/// back to the URL whenever the browser did not report one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tab {
    pub title: String,
    pub url: String,
}

impl Tab {
    /// Creates a tab with an explicit title.
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Creates a tab whose title is its URL.
    ///
    /// This is the shape every legacy bare-string entry is migrated into.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabstash::domain::Tab;
    ///
    /// let tab = Tab::from_url("https://example.com");
    /// assert_eq!(tab.title, "https://example.com");
    /// ```
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            title: url.clone(),
            url,
        }
    }

    /// Creates a tab from a possibly missing or empty title.
    #[must_use]
    pub fn with_fallback_title(title: Option<&str>, url: impl Into<String>) -> Self {
        match title.filter(|t| !t.is_empty()) {
            Some(title) => Self::new(title, url),
            None => Self::from_url(url),
        }
    }
}
