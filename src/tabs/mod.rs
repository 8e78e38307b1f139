//! Browser tab services and the workflows built on them.
//!
//! The crate never talks to a browser directly. Instead it asks for two
//! collaborators:
//!
//! - [`OpenTabsProvider`]: lists the tabs currently open
//! - [`TabOpener`]: opens a URL in a new tab
//!
//! and offers the operations the popup and options pages need on top of them:
//! saving the open tabs as a group and reopening a group or a whole folder.

use crate::domain::error::{EntityKind, Result};
use crate::domain::tab::Tab;
use crate::ops;
use crate::session::Session;
use crate::storage::KeyValueStore;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// A tab as reported by the browser.
///
/// Browsers leave the title empty for tabs that have not loaded yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTab {
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
}

impl OpenTab {
    /// Creates an open tab record.
    #[must_use]
    pub fn new(title: Option<&str>, url: impl Into<String>) -> Self {
        Self {
            title: title.map(String::from),
            url: url.into(),
        }
    }
}

impl From<OpenTab> for Tab {
    fn from(open: OpenTab) -> Self {
        Self::with_fallback_title(open.title.as_deref(), open.url)
    }
}

/// Lists the tabs open in the current window.
pub trait OpenTabsProvider: Send + Sync {
    /// Returns the open tabs in window order.
    ///
    /// # Errors
    ///
    /// Returns [`TabService`](crate::TabstashError::TabService) if the browser
    /// cannot be queried.
    fn query_open_tabs(&self) -> BoxFuture<'_, Result<Vec<OpenTab>>>;
}

/// Opens URLs in new browser tabs.
pub trait TabOpener {
    /// Opens `url` in a new tab.
    ///
    /// # Errors
    ///
    /// Returns [`TabService`](crate::TabstashError::TabService) if the tab
    /// could not be opened.
    fn open_in_new_tab(&self, url: &str) -> Result<()>;
}

/// Saves the currently open tabs as group `name`, replacing its tabs.
///
/// The name is checked before the browser is queried. Tabs without a url are
/// skipped and repeated urls are kept once. Returns the number of tabs saved.
///
/// # Errors
///
/// Returns a validation error for an empty name, or the provider's or store's
/// error.
pub async fn save_open_tabs_as_group<S, P>(
    session: &mut Session<S>,
    provider: &P,
    name: &str,
) -> Result<usize>
where
    S: KeyValueStore,
    P: OpenTabsProvider + ?Sized,
{
    let name = ops::validate_name(name, EntityKind::Group)?;

    let open = provider.query_open_tabs().await?;
    tracing::debug!(group = %name, open_count = open.len(), "saving open tabs");

    session
        .replace_group_tabs(name, open.into_iter().map(Tab::from))
        .await?;

    Ok(ops::group_tabs(session.state(), name).len())
}

/// Opens every tab of a group. A missing group opens nothing.
///
/// Returns the number of tabs opened.
///
/// # Errors
///
/// Stops at and returns the first error from the opener.
pub fn open_group<S, O>(session: &Session<S>, opener: &O, name: &str) -> Result<usize>
where
    S: KeyValueStore,
    O: TabOpener + ?Sized,
{
    open_all(opener, ops::group_tabs(session.state(), name).iter())
}

/// Opens every tab of every group in a folder, in folder order.
///
/// # Errors
///
/// Stops at and returns the first error from the opener.
pub fn open_folder<S, O>(session: &Session<S>, opener: &O, name: &str) -> Result<usize>
where
    S: KeyValueStore,
    O: TabOpener + ?Sized,
{
    open_all(opener, ops::folder_tabs(session.state(), name).into_iter())
}

fn open_all<'a, O, I>(opener: &O, tabs: I) -> Result<usize>
where
    O: TabOpener + ?Sized,
    I: Iterator<Item = &'a Tab>,
{
    let mut opened = 0;
    for tab in tabs {
        opener.open_in_new_tab(&tab.url)?;
        opened += 1;
    }
    tracing::debug!(opened, "tabs opened");
    Ok(opened)
}
