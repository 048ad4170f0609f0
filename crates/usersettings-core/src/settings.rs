// Setting entity types
//
// These types represent a user's settings independently of the backing store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// All settings of one user, keyed by setting code
pub type SettingsMap = HashMap<String, String>;

/// Setting codes with a meaning inside this crate
pub mod setting_codes {
    /// Comma-separated provider priority list, e.g. "openai,mistral"
    pub const LLM_PROVIDERS: &str = "llm_providers";

    pub const OPENAI_API_KEY: &str = "openai_api_key";
    pub const OPENAI_MODEL_NAME: &str = "openai_model_name";
    pub const GOOGLE_API_KEY: &str = "google_api_key";
    pub const GOOGLE_MODEL_NAME: &str = "google_model_name";
    pub const MISTRAL_API_KEY: &str = "mistral_api_key";
    pub const MISTRAL_MODEL_NAME: &str = "mistral_model_name";
}

/// A single named value owned by a user
///
/// Unique per `(user_id, code)`. `value` is `None` when the row was written
/// without a value, which is distinct from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Setting {
    pub id: Uuid,
    pub user_id: String,
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fold setting rows into a [`SettingsMap`]
///
/// Absent values become empty strings. If a code repeats, the later row wins.
pub fn settings_map_from<I>(settings: I) -> SettingsMap
where
    I: IntoIterator<Item = Setting>,
{
    settings
        .into_iter()
        .fold(SettingsMap::new(), |mut acc, setting| {
            acc.insert(setting.code, setting.value.unwrap_or_default());
            acc
        })
}
