// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// This implementation provides a PostgreSQL-compatible API backed by in-memory
// HashMaps, allowing the API server to run without a database for development.

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::models::*;

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    // Keyed by (user_id, code), mirroring the unique constraint
    settings: RwLock<HashMap<(String, String), SettingRow>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    // ============================================
    // Settings
    // ============================================

    pub async fn list_settings(&self, user_id: &str) -> Result<Vec<SettingRow>> {
        let settings = self.settings.read();
        let mut result: Vec<_> = settings
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(result)
    }

    pub async fn upsert_setting(&self, input: UpsertSettingRow) -> Result<SettingRow> {
        let now = Self::now();
        let mut settings = self.settings.write();
        let key = (input.user_id.clone(), input.code.clone());

        if let Some(existing) = settings.get_mut(&key) {
            if input.value.is_some() {
                existing.value = input.value;
            }
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let row = SettingRow {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            code: input.code,
            name: input.name,
            value: input.value,
            created_at: now,
            updated_at: now,
        };
        settings.insert(key, row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_creates_row_named_after_code() {
        let db = InMemoryDatabase::new();

        let row = db
            .upsert_setting(UpsertSettingRow::new("u1", "openai_api_key", Some("sk-1")))
            .await
            .unwrap();

        assert_eq!(row.user_id, "u1");
        assert_eq!(row.code, "openai_api_key");
        assert_eq!(row.name, "openai_api_key");
        assert_eq!(row.value.as_deref(), Some("sk-1"));
        assert_eq!(row.created_at, row.updated_at);
    }

    #[tokio::test]
    async fn test_upsert_updates_in_place() {
        let db = InMemoryDatabase::new();

        let created = db
            .upsert_setting(UpsertSettingRow::new("u1", "theme", Some("light")))
            .await
            .unwrap();
        let updated = db
            .upsert_setting(UpsertSettingRow::new("u1", "theme", Some("dark")))
            .await
            .unwrap();

        assert_eq!(created.id, updated.id);
        assert_eq!(updated.value.as_deref(), Some("dark"));

        let rows = db.list_settings("u1").await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_without_value_keeps_existing() {
        let db = InMemoryDatabase::new();

        db.upsert_setting(UpsertSettingRow::new("u1", "theme", Some("dark")))
            .await
            .unwrap();
        let row = db
            .upsert_setting(UpsertSettingRow::new("u1", "theme", None))
            .await
            .unwrap();

        assert_eq!(row.value.as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn test_upsert_keeps_original_name() {
        let db = InMemoryDatabase::new();

        db.upsert_setting(UpsertSettingRow {
            user_id: "u1".to_string(),
            code: "theme".to_string(),
            name: "Theme".to_string(),
            value: None,
        })
        .await
        .unwrap();
        let row = db
            .upsert_setting(UpsertSettingRow::new("u1", "theme", Some("dark")))
            .await
            .unwrap();

        assert_eq!(row.name, "Theme");
        assert_eq!(row.value.as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn test_list_settings_scoped_to_user() {
        let db = InMemoryDatabase::new();

        for (user, code) in [("u1", "a"), ("u1", "b"), ("u2", "a")] {
            db.upsert_setting(UpsertSettingRow::new(user, code, Some("v")))
                .await
                .unwrap();
        }

        let rows = db.list_settings("u1").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.user_id == "u1"));
        assert!(db.list_settings("u3").await.unwrap().is_empty());

        let rows = db.list_settings("u2").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "a");
    }
}
