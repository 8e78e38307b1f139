//! Error types for tabstash.
//!
//! This module defines the centralized error type [`TabstashError`], the
//! user-facing [`ValidationError`], and a [`Result`] alias used throughout the
//! crate. All errors are implemented with the `thiserror` crate.

use std::fmt;
use thiserror::Error;

/// The kind of named entity an operation targets.
///
/// Used to phrase validation messages ("group" vs "folder").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Group,
    Folder,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group => f.write_str("group"),
            Self::Folder => f.write_str("folder"),
        }
    }
}

/// A rejected create or rename request.
///
/// These are meant to be shown to the end user as-is. The operation that
/// produced one left the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The requested name was empty or whitespace only.
    #[error("Please enter a {kind} name")]
    EmptyName {
        /// Entity the name was meant for.
        kind: EntityKind,
    },

    /// An entity of the same kind already uses this name.
    #[error("{kind} \"{name}\" already exists")]
    Duplicate {
        /// Entity kind that clashed.
        kind: EntityKind,
        /// The clashing name.
        name: String,
    },
}

/// The main error type for tabstash operations.
///
/// Validation failures are expected and user-reportable. Everything else comes
/// from a collaborator (the key-value store or a tab service) and is passed
/// through to the caller without retrying.
///
/// # Examples
///
/// ```
/// use tabstash::domain::{EntityKind, TabstashError, ValidationError};
///
/// let err = TabstashError::from(ValidationError::EmptyName { kind: EntityKind::Folder });
/// assert!(err.is_validation());
/// assert_eq!(err.to_string(), "Please enter a folder name");
/// ```
#[derive(Debug, Error)]
pub enum TabstashError {
    /// A create request was rejected. State is unchanged.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The key-value store failed to read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted data could not be encoded or decoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Listing or opening browser tabs failed.
    #[error("Tab service error: {0}")]
    TabService(String),
}

impl TabstashError {
    /// Returns `true` for user-reportable validation failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// A specialized `Result` type for tabstash operations.
pub type Result<T> = std::result::Result<T, TabstashError>;
