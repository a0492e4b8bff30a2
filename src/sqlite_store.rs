//! SQLite-backed [`KeyValueStore`] implementation.
//!
//! Each key is one row of the `kv_store` table. `set` is a single
//! `INSERT .. ON CONFLICT DO UPDATE`, so a write replaces the whole value
//! atomically.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use tonecheck_core::store::KeyValueStore;

use crate::config::Config;
use crate::{db, migrate};

/// SQLite implementation of the [`KeyValueStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the configured database and make sure the schema exists.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config).await?;
        migrate::run_migrations(&pool)
            .await
            .context("Failed to initialize storage schema")?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("value")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn temp_store(tmp: &TempDir) -> SqliteStore {
        let pool = db::connect_path(&tmp.path().join("data").join("kv.sqlite"))
            .await
            .unwrap();
        migrate::run_migrations(&pool).await.unwrap();
        SqliteStore::new(pool)
    }

    #[tokio::test]
    async fn test_set_get_overwrite_remove() {
        let tmp = TempDir::new().unwrap();
        let store = temp_store(&tmp).await;

        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "[1]").await.unwrap();
        store.set("k", "[2]").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("[2]"));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        {
            let store = temp_store(&tmp).await;
            store.set("history", "[]").await.unwrap();
            store.pool().close().await;
        }
        let store = temp_store(&tmp).await;
        assert_eq!(store.get("history").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = temp_store(&tmp).await;
        migrate::run_migrations(store.pool()).await.unwrap();
        migrate::run_migrations(store.pool()).await.unwrap();
    }
}
