// Core traits for pluggable backends
//
// SettingsStore lets the settings service run against:
// - Postgres in production
// - In-memory maps for dev mode, examples and tests

use async_trait::async_trait;

use crate::error::Result;
use crate::settings::Setting;

// ============================================================================
// SettingsStore - For persisting user settings
// ============================================================================

/// Persistence contract for user settings
///
/// Implementations must surface their own failures through
/// [`crate::SettingsError::Storage`] without rewording them.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load every setting owned by a user, in store iteration order
    async fn find_settings(&self, user_id: &str) -> Result<Vec<Setting>>;

    /// Atomically create or update the setting identified by `(user_id, code)`
    ///
    /// On create the setting's name defaults to its code and an absent value
    /// is stored as absent. On update only the value changes, and an absent
    /// value leaves the stored one untouched. Returns the row as persisted.
    async fn upsert_setting(
        &self,
        user_id: &str,
        code: &str,
        value: Option<&str>,
    ) -> Result<Setting>;
}
