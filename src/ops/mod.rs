//! Mutation API over the storage state.
//!
//! These are plain functions on `&mut StorageState`: they hold all the rules
//! about groups, folders and tabs but know nothing about persistence. The
//! [`Session`](crate::session::Session) wraps each of them with a write to the
//! store.
//!
//! # Modules
//!
//! - [`mutations`]: create/delete/move/remove operations and tab edits
//! - [`queries`]: sorted listings and folder expansion
//!
//! # Group lifecycle
//!
//! ```text
//!   create_group ──► unassigned ──move_group_to_folder──► assigned (one folder)
//!                        ▲                                     │
//!                        └── remove_group_from_folder ─────────┤
//!                        └── delete_folder ────────────────────┘
//!   delete_group removes the group from either state
//! ```

pub mod mutations;
pub mod queries;

pub use mutations::{
    add_tab, create_folder, create_group, delete_folder, delete_group, move_group_to_folder,
    remove_group_from_folder, remove_tab, replace_group_tabs, validate_name,
};
pub use queries::{folder_names, folder_tabs, group_names, group_tabs, unassigned_groups};
