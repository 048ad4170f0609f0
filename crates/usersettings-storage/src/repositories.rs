// Repository layer for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;

/// Bundled schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        tracing::debug!("Postgres pool connected");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply bundled migrations
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        tracing::debug!(count = MIGRATOR.iter().count(), "Migrations up to date");
        Ok(())
    }

    // ============================================
    // Settings
    // ============================================

    pub async fn list_settings(&self, user_id: &str) -> Result<Vec<SettingRow>> {
        let rows = sqlx::query_as::<_, SettingRow>(
            r#"
            SELECT id, user_id, code, name, value, created_at, updated_at
            FROM settings
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert or update the row identified by `(user_id, code)`
    ///
    /// A NULL value on conflict keeps the stored value.
    pub async fn upsert_setting(&self, input: UpsertSettingRow) -> Result<SettingRow> {
        let row = sqlx::query_as::<_, SettingRow>(
            r#"
            INSERT INTO settings (id, user_id, code, name, value)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, code) DO UPDATE
            SET
                value = COALESCE(EXCLUDED.value, settings.value),
                updated_at = NOW()
            RETURNING id, user_id, code, name, value, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.user_id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
