//! 本地存储（对应浏览器 localStorage）
//!
//! 客户端唯一需要持久化的数据是用户 ID，以固定的应用名作为键明文保存。

use anyhow::{Context, Result};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info};

/// 以应用名为键保存用户 ID 的本地存储（基于 sqlx）
#[derive(Clone)]
pub struct LocalStorage {
    db: Pool<Sqlite>,
    app_name: String,
}

impl LocalStorage {
    pub fn new(db: Pool<Sqlite>, app_name: String) -> Self {
        Self { db, app_name }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// 读取缓存的用户 ID，不存在时返回 None
    pub async fn get_user_id(&self) -> Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT storage_value FROM local_storage WHERE storage_key = ?
            "#,
        )
        .bind(&self.app_name)
        .fetch_optional(&self.db)
        .await
        .context("查询本地用户ID失败")?;

        let user_id = row
            .map(|m| m.get::<String, _>("storage_value"))
            .filter(|id| !id.is_empty());
        debug!(
            "[Storage] 读取本地用户ID，键: {}, 结果: {:?}",
            self.app_name, user_id
        );
        Ok(user_id)
    }

    /// 保存（覆盖）用户 ID
    pub async fn set_user_id(&self, user_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO local_storage (storage_key, storage_value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(storage_key) DO UPDATE SET
                storage_value = excluded.storage_value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.app_name)
        .bind(user_id)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&self.db)
        .await
        .context("保存本地用户ID失败")?;

        info!("[Storage] 已保存本地用户ID: {}", user_id);
        Ok(())
    }

    /// 删除缓存的用户 ID
    pub async fn clear_user_id(&self) -> Result<()> {
        sqlx::query("DELETE FROM local_storage WHERE storage_key = ?")
            .bind(&self.app_name)
            .execute(&self.db)
            .await
            .context("删除本地用户ID失败")?;
        info!("[Storage] 已清除本地用户ID，键: {}", self.app_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::db::create_sqlite_pool_with_migration;

    async fn memory_storage(app_name: &str) -> LocalStorage {
        let pool = create_sqlite_pool_with_migration("sqlite::memory:")
            .await
            .unwrap();
        LocalStorage::new(pool, app_name.to_string())
    }

    #[tokio::test]
    async fn user_id_round_trips_under_app_key() -> Result<()> {
        let storage = memory_storage("luvvtapp").await;
        assert_eq!(storage.get_user_id().await?, None);

        storage.set_user_id("u-1").await?;
        assert_eq!(storage.get_user_id().await?.as_deref(), Some("u-1"));

        // 覆盖写入只保留最新值
        storage.set_user_id("u-2").await?;
        assert_eq!(storage.get_user_id().await?.as_deref(), Some("u-2"));

        storage.clear_user_id().await?;
        assert_eq!(storage.get_user_id().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn keys_are_isolated_per_app_name() -> Result<()> {
        let pool = create_sqlite_pool_with_migration("sqlite::memory:").await?;
        let a = LocalStorage::new(pool.clone(), "app-a".to_string());
        let b = LocalStorage::new(pool, "app-b".to_string());

        a.set_user_id("alice").await?;
        assert_eq!(b.get_user_id().await?, None);
        assert_eq!(a.app_name(), "app-a");
        Ok(())
    }
}
