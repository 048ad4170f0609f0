// User Settings Abstraction
//
// This crate provides a DB-agnostic implementation of user-scoped settings:
// loading a user's settings into a map, writing single settings via upsert,
// and deriving LLM provider configuration from the loaded map.
//
// Key design decisions:
// - Uses a trait (SettingsStore) for pluggable backends
// - Request-scoped memoization is an explicit RequestScope value owned by the caller
// - Provider dispatch is table-driven (LlmProviderKind descriptors)
// - Absent setting values are modeled as Option, never as empty strings

pub mod error;
pub mod llm_settings;
pub mod scope;
pub mod service;
pub mod settings;
pub mod traits;

// In-memory implementations for examples and testing
pub mod memory;

// Re-exports for convenience
pub use error::{Result, SettingsError};
pub use llm_settings::{
    get_llm_settings, parse_priority_list, LlmProviderKind, LlmSettings, ProviderConfig,
    ProviderDescriptor,
};
pub use memory::InMemorySettingsStore;
pub use scope::RequestScope;
pub use service::SettingsService;
pub use settings::{setting_codes, settings_map_from, Setting, SettingsMap};
pub use traits::SettingsStore;
