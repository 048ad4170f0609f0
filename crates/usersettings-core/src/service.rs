// Settings service
//
// Loads and writes user settings through a SettingsStore. Every operation
// optionally takes a RequestScope; with a scope, repeated calls that carry
// identical arguments reuse the first result.
//
// A successful write drops the memoized settings load of that user and any
// memoized write of the same setting with another value, so later calls in
// the same request observe the write.

use std::sync::Arc;

use crate::error::Result;
use crate::llm_settings::{get_llm_settings, LlmSettings};
use crate::scope::RequestScope;
use crate::settings::{settings_map_from, Setting, SettingsMap};
use crate::traits::SettingsStore;

#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Load all settings of a user as a code -> value map
    ///
    /// Absent values appear as empty strings. Store failures are returned
    /// as-is.
    pub async fn get_settings(
        &self,
        scope: Option<&RequestScope>,
        user_id: &str,
    ) -> Result<SettingsMap> {
        match scope {
            Some(scope) => scope.settings(user_id, || self.load(user_id)).await,
            None => self.load(user_id).await,
        }
    }

    /// Create or update one setting of a user
    pub async fn update_settings(
        &self,
        scope: Option<&RequestScope>,
        user_id: &str,
        code: &str,
        value: Option<&str>,
    ) -> Result<Setting> {
        match scope {
            Some(scope) => {
                let setting = scope
                    .update(user_id, code, value, || self.write(user_id, code, value))
                    .await?;
                scope.invalidate_updates(user_id, code, value);
                scope.invalidate_settings(user_id);
                Ok(setting)
            }
            None => self.write(user_id, code, value).await,
        }
    }

    /// Load a user's settings and derive the configured LLM providers
    pub async fn get_llm_settings(
        &self,
        scope: Option<&RequestScope>,
        user_id: &str,
    ) -> Result<LlmSettings> {
        let settings = self.get_settings(scope, user_id).await?;
        Ok(get_llm_settings(&settings))
    }

    async fn load(&self, user_id: &str) -> Result<SettingsMap> {
        let rows = self.store.find_settings(user_id).await?;
        tracing::debug!(user_id, rows = rows.len(), "Loaded settings");
        Ok(settings_map_from(rows))
    }

    async fn write(&self, user_id: &str, code: &str, value: Option<&str>) -> Result<Setting> {
        let setting = self.store.upsert_setting(user_id, code, value).await?;
        tracing::debug!(
            user_id,
            code,
            setting_id = %setting.id,
            has_value = setting.value.is_some(),
            "Upserted setting"
        );
        Ok(setting)
    }
}
