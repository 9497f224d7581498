//! 迁移快照的文档结构、导入状态与错误分类

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::journal::action::models::{ActionDetails, TimelineAction};
use crate::journal::companion::models::Companion;
use crate::journal::types::Area;
use crate::journal::visit::models::Visit;

/// 当前快照文档版本
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// metadata.note 的固定说明文案
pub const PHOTO_EXCLUSION_NOTE: &str =
    "照片不随快照导出，仅保留数量；请在新设备上重新关联相册资源";

/// 快照里的时间线活动：与 [`TimelineAction`] 字段一致，
/// 但照片列表只保留数量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotAction {
    pub id: String,
    pub visit_id: String,
    pub area: Area,
    pub location_name: String,
    pub time: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duration_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub wait_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
    /// 原照片列表的长度
    #[serde(default)]
    pub photo_count: u64,
    #[serde(flatten)]
    pub details: ActionDetails,
}

impl SnapshotAction {
    pub fn from_action(action: &TimelineAction) -> Self {
        Self {
            id: action.id.clone(),
            visit_id: action.visit_id.clone(),
            area: action.area,
            location_name: action.location_name.clone(),
            time: action.time,
            duration_minutes: action.duration_minutes,
            wait_minutes: action.wait_minutes,
            rating: action.rating,
            notes: action.notes.clone(),
            photo_count: action.photos.len() as u64,
            details: action.details.clone(),
        }
    }

    /// 还原为本地活动；照片在导出侧已被剔除，导入后列表为空
    pub fn into_action(self) -> TimelineAction {
        TimelineAction {
            id: self.id,
            visit_id: self.visit_id,
            area: self.area,
            location_name: self.location_name,
            time: self.time,
            duration_minutes: self.duration_minutes,
            wait_minutes: self.wait_minutes,
            rating: self.rating,
            notes: self.notes,
            photos: Vec::new(),
            details: self.details,
        }
    }
}

/// 快照尾部的汇总信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub total_visits: u64,
    pub total_actions: u64,
    pub total_companions: u64,
    /// 导出时被剔除的照片总数
    pub exported_photos: u64,
    pub note: String,
}

/// 一次性全量快照文档
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    pub version: String,
    /// 导出时刻（RFC 3339，UTC）
    pub export_date: DateTime<Utc>,
    pub visits: Vec<Visit>,
    pub companions: Vec<Companion>,
    pub actions: Vec<SnapshotAction>,
    pub metadata: SnapshotMetadata,
}

/// 导入完成后的结果汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported_visits: u64,
    pub imported_companions: u64,
    pub imported_actions: u64,
    /// 快照内声明、导入侧直接丢弃的照片数
    pub dropped_photos: u64,
    pub source_version: String,
}

/// 导入前的本地存量预览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePreview {
    pub total_visits: u64,
    pub total_companions: u64,
    pub total_actions: u64,
    pub total_photos: u64,
}

/// 导入状态机
///
/// Idle → Validating → (Rejected | Clearing → Inserting → Completed)。
/// 没有部分完成态，也不支持取消；写入阶段失败时状态停在出错的阶段。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ImportState {
    Idle,
    Validating,
    Rejected,
    Clearing,
    Inserting,
    Completed,
}

/// 迁移失败的分类
#[derive(Debug, Error)]
pub enum MigrationError {
    /// 文档未通过校验；存储未被改动
    #[error("快照校验未通过：{}", .0.join("；"))]
    Validation(Vec<String>),
    /// 写入阶段中途失败；存储可能已被部分改写，不做回滚
    #[error("导入写入阶段失败（已写入 {inserted} 条记录）: {source}")]
    PartialImport {
        inserted: u64,
        #[source]
        source: anyhow::Error,
    },
    /// 其它存储读写失败
    #[error("存储操作失败: {0}")]
    Storage(#[from] anyhow::Error),
}

impl MigrationError {
    /// 校验错误列表；非校验失败时为空
    pub fn validation_messages(&self) -> &[String] {
        match self {
            MigrationError::Validation(messages) => messages,
            _ => &[],
        }
    }
}
