// In-memory implementations for examples and testing
//
// These implementations keep all data in memory, making them perfect for:
// - Unit tests
// - Quick prototyping without a database

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::settings::Setting;
use crate::traits::SettingsStore;

// ============================================================================
// InMemorySettingsStore - Stores settings in memory
// ============================================================================

/// In-memory settings store
///
/// Settings are keyed by `(user_id, code)`. Call counters make it easy to
/// assert how often the store was reached.
#[derive(Debug, Default, Clone)]
pub struct InMemorySettingsStore {
    settings: Arc<RwLock<HashMap<(String, String), Setting>>>,
    find_calls: Arc<AtomicUsize>,
    upsert_calls: Arc<AtomicUsize>,
}

impl InMemorySettingsStore {
    /// Create a new in-memory settings store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `find_settings` calls served so far
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Number of `upsert_setting` calls served so far
    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    /// Number of stored rows across all users
    pub async fn len(&self) -> usize {
        self.settings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.settings.read().await.is_empty()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn find_settings(&self, user_id: &str) -> Result<Vec<Setting>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let mut rows: Vec<Setting> = self
            .settings
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn upsert_setting(
        &self,
        user_id: &str,
        code: &str,
        value: Option<&str>,
    ) -> Result<Setting> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let mut settings = self.settings.write().await;
        let row = settings
            .entry((user_id.to_string(), code.to_string()))
            .and_modify(|s| {
                if let Some(value) = value {
                    s.value = Some(value.to_string());
                }
                s.updated_at = now;
            })
            .or_insert_with(|| Setting {
                id: Uuid::now_v7(),
                user_id: user_id.to_string(),
                code: code.to_string(),
                name: code.to_string(),
                value: value.map(str::to_string),
                created_at: now,
                updated_at: now,
            });
        Ok(row.clone())
    }
}
