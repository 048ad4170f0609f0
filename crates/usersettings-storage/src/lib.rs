// Storage layer for user settings
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// This crate provides database implementations for core traits:
// - DbSettingsStore: implements SettingsStore for settings persistence

pub mod backend;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod settings_store;

pub use backend::StorageBackend;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use repositories::*;
pub use settings_store::{create_db_settings_store, DbSettingsStore};
