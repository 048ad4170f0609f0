// Database-backed SettingsStore implementation
//
// This module implements the core SettingsStore trait on top of the
// StorageBackend, so the settings service works against Postgres or the
// in-memory dev database alike. Backend errors are passed through untouched.

use async_trait::async_trait;
use usersettings_core::{traits::SettingsStore, Result, Setting, SettingsError};

use crate::backend::StorageBackend;
use crate::models::UpsertSettingRow;

// ============================================================================
// DbSettingsStore - Reads and writes settings through the storage backend
// ============================================================================

/// Backend-agnostic settings store
#[derive(Clone)]
pub struct DbSettingsStore {
    backend: StorageBackend,
}

impl DbSettingsStore {
    pub fn new(backend: StorageBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl SettingsStore for DbSettingsStore {
    async fn find_settings(&self, user_id: &str) -> Result<Vec<Setting>> {
        let rows = self
            .backend
            .list_settings(user_id)
            .await
            .map_err(SettingsError::Storage)?;

        Ok(rows.into_iter().map(Setting::from).collect())
    }

    async fn upsert_setting(
        &self,
        user_id: &str,
        code: &str,
        value: Option<&str>,
    ) -> Result<Setting> {
        let row = self
            .backend
            .upsert_setting(UpsertSettingRow::new(user_id, code, value))
            .await
            .map_err(SettingsError::Storage)?;

        Ok(row.into())
    }
}

// ============================================================================
// Factory functions
// ============================================================================

/// Create a settings store over the given backend
pub fn create_db_settings_store(backend: StorageBackend) -> DbSettingsStore {
    DbSettingsStore::new(backend)
}
