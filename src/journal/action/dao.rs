//! 时间线活动数据访问层（DAO）
//!
//! 负责所有时间线活动相关的数据库操作。类别专属字段与照片列表
//! 以 JSON 文本列落库，读写时经由 serde 编解码。

use crate::journal::action::models::{ActionDetails, Photo, TimelineAction};
use crate::journal::types::Area;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::debug;

/// 时间线活动 DAO（基于 sqlx）
pub struct ActionDao {
    db: Pool<Sqlite>,
}

const ACTION_COLUMNS: &str = r#"
    action_id,
    visit_id,
    category,
    area,
    location_name,
    happened_at,
    duration_minutes,
    wait_minutes,
    rating,
    notes,
    details,
    photos
"#;

impl ActionDao {
    /// 创建新的时间线活动 DAO
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    fn row_to_action(row: &SqliteRow) -> Result<TimelineAction> {
        let area_raw: String = row.get("area");
        let area =
            Area::from_str(&area_raw).with_context(|| format!("未知的区域标识: {}", area_raw))?;

        let details_raw: String = row.get("details");
        let details: ActionDetails =
            serde_json::from_str(&details_raw).context("解析活动类别字段失败")?;

        let photos_raw: String = row.get("photos");
        let photos: Vec<Photo> =
            serde_json::from_str(&photos_raw).context("解析活动照片列表失败")?;

        Ok(TimelineAction {
            id: row.get("action_id"),
            visit_id: row.get("visit_id"),
            area,
            location_name: row.get("location_name"),
            time: row.get::<NaiveDateTime, _>("happened_at"),
            duration_minutes: row
                .get::<Option<i64>, _>("duration_minutes")
                .map(|v| v as i32),
            wait_minutes: row.get::<Option<i64>, _>("wait_minutes").map(|v| v as i32),
            rating: row.get::<Option<i64>, _>("rating").map(|v| v as u8),
            notes: row.get("notes"),
            details,
            photos,
        })
    }

    /// 从数据库获取所有时间线活动
    pub async fn get_all_actions(&self) -> Result<Vec<TimelineAction>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM local_timeline_actions ORDER BY happened_at, action_id",
            ACTION_COLUMNS
        ))
        .fetch_all(&self.db)
        .await
        .context("查询时间线活动列表失败")?;

        let actions = rows
            .iter()
            .map(Self::row_to_action)
            .collect::<Result<Vec<_>>>()?;

        debug!("[ActionDAO] 获取本地时间线活动，共 {} 条", actions.len());
        Ok(actions)
    }

    /// 按 ID 获取单条时间线活动
    pub async fn get_action(&self, action_id: &str) -> Result<Option<TimelineAction>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM local_timeline_actions WHERE action_id = ?",
            ACTION_COLUMNS
        ))
        .bind(action_id)
        .fetch_optional(&self.db)
        .await
        .context("查询时间线活动失败")?;

        row.as_ref().map(Self::row_to_action).transpose()
    }

    /// 获取某次游园的全部活动，按发生时间升序
    pub async fn get_actions_by_visit(&self, visit_id: &str) -> Result<Vec<TimelineAction>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM local_timeline_actions WHERE visit_id = ? ORDER BY happened_at, action_id",
            ACTION_COLUMNS
        ))
        .bind(visit_id)
        .fetch_all(&self.db)
        .await
        .context("查询游园活动列表失败")?;

        let actions = rows
            .iter()
            .map(Self::row_to_action)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "[ActionDAO] 获取游园 {} 的活动，共 {} 条",
            visit_id,
            actions.len()
        );
        Ok(actions)
    }

    /// 插入或更新时间线活动到数据库
    pub async fn upsert_action(&self, a: &TimelineAction) -> Result<()> {
        let sql = r#"
            INSERT INTO local_timeline_actions (
                action_id,
                visit_id,
                category,
                area,
                location_name,
                happened_at,
                duration_minutes,
                wait_minutes,
                rating,
                notes,
                details,
                photos
            ) VALUES (
                ?,?,?,?,?,?,?,?,?,?,?,?
            )
            ON CONFLICT(action_id) DO UPDATE SET
                visit_id = excluded.visit_id,
                category = excluded.category,
                area = excluded.area,
                location_name = excluded.location_name,
                happened_at = excluded.happened_at,
                duration_minutes = excluded.duration_minutes,
                wait_minutes = excluded.wait_minutes,
                rating = excluded.rating,
                notes = excluded.notes,
                details = excluded.details,
                photos = excluded.photos
        "#;

        let details = serde_json::to_string(&a.details).context("序列化活动类别字段失败")?;
        let photos = serde_json::to_string(&a.photos).context("序列化活动照片列表失败")?;

        sqlx::query(sql)
            .bind(&a.id)
            .bind(&a.visit_id)
            .bind(a.category().to_string())
            .bind(a.area.to_string())
            .bind(&a.location_name)
            .bind(a.time)
            .bind(a.duration_minutes.map(|v| v as i64))
            .bind(a.wait_minutes.map(|v| v as i64))
            .bind(a.rating.map(|v| v as i64))
            .bind(&a.notes)
            .bind(details)
            .bind(photos)
            .execute(&self.db)
            .await
            .context("插入或更新时间线活动失败")?;
        Ok(())
    }

    /// 从数据库删除时间线活动
    pub async fn delete_action(&self, action_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM local_timeline_actions WHERE action_id = ?")
            .bind(action_id)
            .execute(&self.db)
            .await
            .context("删除时间线活动失败")?;
        Ok(())
    }

    /// 删除某次游园的全部活动
    pub async fn delete_actions_by_visit(&self, visit_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM local_timeline_actions WHERE visit_id = ?")
            .bind(visit_id)
            .execute(&self.db)
            .await
            .context("删除游园活动失败")?;
        Ok(result.rows_affected())
    }

    /// 清空时间线活动表
    pub async fn clear_actions(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM local_timeline_actions")
            .execute(&self.db)
            .await
            .context("清空时间线活动表失败")?;
        debug!(
            "[ActionDAO] 清空时间线活动表，删除 {} 条",
            result.rows_affected()
        );
        Ok(())
    }
}
