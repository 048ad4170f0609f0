// Database models (internal, may differ from public domain types)

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use usersettings_core::Setting;
use uuid::Uuid;

// ============================================
// Setting models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct SettingRow {
    pub id: Uuid,
    pub user_id: String,
    pub code: String,
    pub name: String,
    pub value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create-or-update input keyed by `(user_id, code)`
#[derive(Debug, Clone)]
pub struct UpsertSettingRow {
    pub user_id: String,
    pub code: String,
    /// Used only when the row is created
    pub name: String,
    pub value: Option<String>,
}

impl UpsertSettingRow {
    /// Upsert whose created row is named after its code
    pub fn new(user_id: &str, code: &str, value: Option<&str>) -> Self {
        Self {
            user_id: user_id.to_string(),
            code: code.to_string(),
            name: code.to_string(),
            value: value.map(str::to_string),
        }
    }
}

impl From<SettingRow> for Setting {
    fn from(row: SettingRow) -> Self {
        Setting {
            id: row.id,
            user_id: row.user_id,
            code: row.code,
            name: row.name,
            value: row.value,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
