//! Domain layer for tabstash.
//!
//! This module contains the persisted data model, independent of any storage
//! backend or browser API.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`tab`]: The saved tab model
//! - [`state`]: Groups, folders and the invariants tying them together
//! - [`schema`]: Persisted schema versions and shape detection
//!
//! # Examples
//!
//! ```
//! use tabstash::domain::{StorageState, Tab};
//!
//! let mut state = StorageState::new();
//! state.groups.insert("work".to_string(), vec![Tab::from_url("https://a.test")]);
//! assert!(state.is_consistent());
//! ```

pub mod error;
pub mod schema;
pub mod state;
pub mod tab;

pub use error::{EntityKind, Result, TabstashError, ValidationError};
pub use schema::{detect_version, is_legacy_shape, is_tab_object, RawData, SchemaVersion};
pub use state::{Folder, Group, StorageState, Violation};
pub use tab::Tab;
