//! Storage layer for persisted groups and folders.
//!
//! This module provides the key-value store abstraction the session writes
//! through, plus two backends.
//!
//! # Modules
//!
//! - `backend`: The [`KeyValueStore`] trait
//! - `memory`: Shared in-memory store, used by tests and embedders
//! - `json`: JSON file store with atomic writes

pub mod backend;
pub mod json;
pub mod memory;

pub use backend::KeyValueStore;
pub use json::JsonFileStore;
pub use memory::MemoryStore;
