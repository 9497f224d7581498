//! 游园记录数据访问层（DAO）
//!
//! 负责所有游园记录相关的数据库操作，将数据访问逻辑与业务逻辑分离。

use crate::journal::types::{Park, PassType, Weather};
use crate::journal::visit::models::Visit;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::debug;

/// 游园记录 DAO（基于 sqlx）
pub struct VisitDao {
    db: Pool<Sqlite>,
}

const VISIT_COLUMNS: &str = r#"
    visit_id,
    visit_date,
    park,
    companion_ids,
    pass_type,
    weather,
    start_time,
    end_time,
    notes,
    action_count,
    photo_count
"#;

impl VisitDao {
    /// 创建新的游园记录 DAO
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    fn row_to_visit(row: &SqliteRow) -> Result<Visit> {
        let park_raw: String = row.get("park");
        let park = Park::from_str(&park_raw)
            .with_context(|| format!("未知的乐园标识: {}", park_raw))?;

        let pass_type = match row.get::<Option<String>, _>("pass_type") {
            Some(raw) => Some(
                PassType::from_str(&raw)
                    .with_context(|| format!("未知的门票类型: {}", raw))?,
            ),
            None => None,
        };
        let weather = match row.get::<Option<String>, _>("weather") {
            Some(raw) => Some(
                Weather::from_str(&raw).with_context(|| format!("未知的天气标识: {}", raw))?,
            ),
            None => None,
        };

        let companion_ids_raw: String = row.get("companion_ids");
        let companion_ids: Vec<String> =
            serde_json::from_str(&companion_ids_raw).context("解析同行伙伴ID列表失败")?;

        Ok(Visit {
            id: row.get("visit_id"),
            date: row.get::<NaiveDate, _>("visit_date"),
            park,
            companion_ids,
            pass_type,
            weather,
            start_time: row.get::<Option<NaiveTime>, _>("start_time"),
            end_time: row.get::<Option<NaiveTime>, _>("end_time"),
            notes: row.get("notes"),
            action_count: row.get::<Option<i64>, _>("action_count").map(|v| v as u32),
            photo_count: row.get::<Option<i64>, _>("photo_count").map(|v| v as u32),
        })
    }

    /// 从数据库获取所有游园记录
    pub async fn get_all_visits(&self) -> Result<Vec<Visit>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM local_visits ORDER BY visit_date, visit_id",
            VISIT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await
        .context("查询游园记录列表失败")?;

        let visits = rows
            .iter()
            .map(Self::row_to_visit)
            .collect::<Result<Vec<_>>>()?;

        debug!("[VisitDAO] 获取本地游园记录，共 {} 条", visits.len());
        Ok(visits)
    }

    /// 按 ID 获取单条游园记录
    pub async fn get_visit(&self, visit_id: &str) -> Result<Option<Visit>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM local_visits WHERE visit_id = ?",
            VISIT_COLUMNS
        ))
        .bind(visit_id)
        .fetch_optional(&self.db)
        .await
        .context("查询游园记录失败")?;

        row.as_ref().map(Self::row_to_visit).transpose()
    }

    /// 插入或更新游园记录到数据库
    pub async fn upsert_visit(&self, v: &Visit) -> Result<()> {
        let sql = r#"
            INSERT INTO local_visits (
                visit_id,
                visit_date,
                park,
                companion_ids,
                pass_type,
                weather,
                start_time,
                end_time,
                notes,
                action_count,
                photo_count
            ) VALUES (
                ?,?,?,?,?,?,?,?,?,?,?
            )
            ON CONFLICT(visit_id) DO UPDATE SET
                visit_date = excluded.visit_date,
                park = excluded.park,
                companion_ids = excluded.companion_ids,
                pass_type = excluded.pass_type,
                weather = excluded.weather,
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                notes = excluded.notes,
                action_count = excluded.action_count,
                photo_count = excluded.photo_count
        "#;

        let companion_ids =
            serde_json::to_string(&v.companion_ids).context("序列化同行伙伴ID列表失败")?;

        sqlx::query(sql)
            .bind(&v.id)
            .bind(v.date)
            .bind(v.park.to_string())
            .bind(companion_ids)
            .bind(v.pass_type.map(|p| p.to_string()))
            .bind(v.weather.map(|w| w.to_string()))
            .bind(v.start_time)
            .bind(v.end_time)
            .bind(&v.notes)
            .bind(v.action_count.map(|c| c as i64))
            .bind(v.photo_count.map(|c| c as i64))
            .execute(&self.db)
            .await
            .context("插入或更新游园记录失败")?;
        Ok(())
    }

    /// 从数据库删除游园记录
    pub async fn delete_visit(&self, visit_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM local_visits WHERE visit_id = ?")
            .bind(visit_id)
            .execute(&self.db)
            .await
            .context("删除游园记录失败")?;
        Ok(())
    }

    /// 清空游园记录表
    pub async fn clear_visits(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM local_visits")
            .execute(&self.db)
            .await
            .context("清空游园记录表失败")?;
        debug!("[VisitDAO] 清空游园记录表，删除 {} 条", result.rows_affected());
        Ok(())
    }
}
