// Request-scoped memoization
//
// A RequestScope lives for one logical caller-initiated operation (for the
// HTTP API: one request). Repeated loads or writes with identical arguments
// inside the scope share a single in-flight or completed result instead of
// reaching the store again. Nothing is shared between scopes.
//
// Failed calls are not memoized: the next caller with the same arguments
// runs the operation again.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::error::Result;
use crate::settings::{Setting, SettingsMap};

type Slot<T> = Arc<OnceCell<T>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct UpdateKey {
    user_id: String,
    code: String,
    value: Option<String>,
}

/// Memoization context for a single request
#[derive(Debug)]
pub struct RequestScope {
    id: Uuid,
    settings: Mutex<HashMap<String, Slot<SettingsMap>>>,
    updates: Mutex<HashMap<UpdateKey, Slot<Setting>>>,
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestScope {
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            settings: Mutex::new(HashMap::new()),
            updates: Mutex::new(HashMap::new()),
        }
    }

    /// Identifier for correlating log lines of one request
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Memoized settings load for `user_id`
    ///
    /// `load` runs at most once per user while it keeps succeeding; concurrent
    /// callers wait for the first one.
    pub async fn settings<F, Fut>(&self, user_id: &str, load: F) -> Result<SettingsMap>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SettingsMap>>,
    {
        let slot = self
            .settings
            .lock()
            .entry(user_id.to_string())
            .or_default()
            .clone();

        if slot.initialized() {
            tracing::trace!(scope = %self.id, user_id, "Settings served from request scope");
        }

        slot.get_or_try_init(load).await.cloned()
    }

    /// Memoized write keyed by `(user_id, code, value)`
    pub async fn update<F, Fut>(
        &self,
        user_id: &str,
        code: &str,
        value: Option<&str>,
        write: F,
    ) -> Result<Setting>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Setting>>,
    {
        let key = UpdateKey {
            user_id: user_id.to_string(),
            code: code.to_string(),
            value: value.map(str::to_string),
        };
        let slot = self.updates.lock().entry(key).or_default().clone();

        if slot.initialized() {
            tracing::trace!(scope = %self.id, user_id, code, "Write served from request scope");
        }

        slot.get_or_try_init(write).await.cloned()
    }

    /// Drop the memoized settings load for `user_id`
    ///
    /// Returns true if an entry was removed. Callers already waiting on the
    /// old entry still receive its result.
    pub fn invalidate_settings(&self, user_id: &str) -> bool {
        self.settings.lock().remove(user_id).is_some()
    }

    /// Drop memoized writes of `(user_id, code)` whose value differs from `keep`
    ///
    /// Returns the number of entries removed. After a write lands, earlier
    /// writes of the same setting no longer describe the stored row.
    pub fn invalidate_updates(&self, user_id: &str, code: &str, keep: Option<&str>) -> usize {
        let mut updates = self.updates.lock();
        let before = updates.len();
        updates.retain(|key, _| {
            key.user_id != user_id || key.code != code || key.value.as_deref() == keep
        });
        before - updates.len()
    }

    /// Whether a completed settings load for `user_id` is memoized
    pub fn has_settings(&self, user_id: &str) -> bool {
        self.settings
            .lock()
            .get(user_id)
            .is_some_and(|slot| slot.initialized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettingsError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn map(pairs: &[(&str, &str)]) -> SettingsMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_repeated_load_runs_once() {
        let scope = RequestScope::new();
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        for _ in 0..3 {
            let loaded = scope
                .settings("u1", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(map(&[("theme", "dark")]))
                })
                .await
                .unwrap();
            assert_eq!(loaded["theme"], "dark");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(scope.has_settings("u1"));
    }

    #[tokio::test]
    async fn test_different_users_are_separate_entries() {
        let scope = RequestScope::new();
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        for user in ["u1", "u2", "u1"] {
            scope
                .settings(user, move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(SettingsMap::new())
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_call() {
        let scope = RequestScope::new();
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        let load = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(map(&[("a", "1")]))
        };

        let (a, b) = futures::join!(scope.settings("u1", load), scope.settings("u1", load));
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_memoized() {
        let scope = RequestScope::new();

        let err = scope
            .settings("u1", || async {
                Err(SettingsError::storage(anyhow::anyhow!("timeout")))
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "timeout");
        assert!(!scope.has_settings("u1"));

        let loaded = scope
            .settings("u1", || async { Ok(map(&[("a", "1")])) })
            .await
            .unwrap();
        assert_eq!(loaded["a"], "1");
    }

    fn setting(code: &str, value: Option<&str>) -> Setting {
        let now = chrono::Utc::now();
        Setting {
            id: Uuid::now_v7(),
            user_id: "u1".to_string(),
            code: code.to_string(),
            name: code.to_string(),
            value: value.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_failed_update_is_not_memoized() {
        let scope = RequestScope::new();
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        let err = scope
            .update("u1", "theme", Some("dark"), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(SettingsError::storage(anyhow::anyhow!("deadlock detected")))
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "deadlock detected");

        let written = scope
            .update("u1", "theme", Some("dark"), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(setting("theme", Some("dark")))
            })
            .await
            .unwrap();

        assert_eq!(written.value.as_deref(), Some("dark"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_updates_keeps_current_value_only() {
        let scope = RequestScope::new();

        for (code, value) in [
            ("theme", Some("dark")),
            ("theme", Some("light")),
            ("theme", None),
            ("lang", Some("en")),
        ] {
            scope
                .update("u1", code, value, || async move { Ok(setting(code, value)) })
                .await
                .unwrap();
        }

        assert_eq!(scope.invalidate_updates("u1", "theme", Some("light")), 2);
        assert_eq!(scope.invalidate_updates("u1", "theme", Some("light")), 0);
        assert_eq!(scope.invalidate_updates("u2", "lang", None), 0);

        let calls = AtomicUsize::new(0);
        let calls = &calls;
        scope
            .update("u1", "theme", Some("light"), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(setting("theme", Some("light")))
            })
            .await
            .unwrap();
        scope
            .update("u1", "theme", Some("dark"), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(setting("theme", Some("dark")))
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let scope = RequestScope::new();
        let calls = AtomicUsize::new(0);
        let calls = &calls;
        let load = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(SettingsMap::new())
        };

        scope.settings("u1", load).await.unwrap();
        assert!(scope.invalidate_settings("u1"));
        assert!(!scope.invalidate_settings("u1"));
        scope.settings("u1", load).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_scopes_do_not_share_entries() {
        let first = RequestScope::new();
        let second = RequestScope::new();
        assert_ne!(first.id(), second.id());

        first
            .settings("u1", || async { Ok(map(&[("a", "old")])) })
            .await
            .unwrap();
        let loaded = second
            .settings("u1", || async { Ok(map(&[("a", "new")])) })
            .await
            .unwrap();

        assert_eq!(loaded["a"], "new");
    }
}
