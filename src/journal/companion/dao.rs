//! 同行伙伴数据访问层（DAO）
//!
//! 负责所有同行伙伴相关的数据库操作，将数据访问逻辑与业务逻辑分离。

use crate::journal::companion::models::Companion;
use anyhow::{Context, Result};
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

/// 同行伙伴 DAO（基于 sqlx）
pub struct CompanionDao {
    db: Pool<Sqlite>,
}

impl CompanionDao {
    /// 创建新的同行伙伴 DAO
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    /// 从数据库获取所有同行伙伴
    pub async fn get_all_companions(&self) -> Result<Vec<Companion>> {
        let rows = sqlx::query(
            r#"
            SELECT companion_id, name, created_at
            FROM local_companions
            ORDER BY companion_id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("查询同行伙伴列表失败")?;

        let companions: Vec<Companion> = rows
            .into_iter()
            .map(|m| Companion {
                id: m.get("companion_id"),
                name: m.get("name"),
                created_at: m.get("created_at"),
            })
            .collect();

        debug!("[CompanionDAO] 获取本地同行伙伴，共 {} 位", companions.len());
        Ok(companions)
    }

    /// 按 ID 获取单个同行伙伴
    pub async fn get_companion(&self, companion_id: &str) -> Result<Option<Companion>> {
        let row = sqlx::query(
            r#"
            SELECT companion_id, name, created_at
            FROM local_companions
            WHERE companion_id = ?
            "#,
        )
        .bind(companion_id)
        .fetch_optional(&self.db)
        .await
        .context("查询同行伙伴失败")?;

        Ok(row.map(|m| Companion {
            id: m.get("companion_id"),
            name: m.get("name"),
            created_at: m.get("created_at"),
        }))
    }

    /// 插入或更新同行伙伴到数据库
    pub async fn upsert_companion(&self, c: &Companion) -> Result<()> {
        let sql = r#"
            INSERT INTO local_companions (
                companion_id, name, created_at
            ) VALUES (?, ?, ?)
            ON CONFLICT(companion_id) DO UPDATE SET
                name = excluded.name,
                created_at = excluded.created_at
        "#;

        sqlx::query(sql)
            .bind(&c.id)
            .bind(&c.name)
            .bind(c.created_at)
            .execute(&self.db)
            .await
            .context("插入或更新同行伙伴失败")?;
        Ok(())
    }

    /// 从数据库删除同行伙伴
    pub async fn delete_companion(&self, companion_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM local_companions WHERE companion_id = ?")
            .bind(companion_id)
            .execute(&self.db)
            .await
            .context("删除同行伙伴失败")?;
        Ok(())
    }

    /// 清空同行伙伴表
    pub async fn clear_companions(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM local_companions")
            .execute(&self.db)
            .await
            .context("清空同行伙伴表失败")?;
        debug!(
            "[CompanionDAO] 清空同行伙伴表，删除 {} 位",
            result.rows_affected()
        );
        Ok(())
    }
}
