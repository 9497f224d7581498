//! 游园记录本地模型定义

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::journal::types::{Park, PassType, Weather};

/// 游园记录（某一天到某一座乐园的一次入园）
///
/// `companion_ids` 是 visit→companion 关系的权威边表；
/// 伙伴侧的 visit 列表不落库，按需由伙伴服务扫描推导。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    /// 游园日期（必填）
    pub date: NaiveDate,
    /// 乐园（必填）
    pub park: Park,
    /// 同行伙伴 ID 列表
    #[serde(default)]
    pub companion_ids: Vec<String>,
    /// 门票类型
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pass_type: Option<PassType>,
    /// 当日天气
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weather: Option<Weather>,
    /// 入园时间
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_time: Option<NaiveTime>,
    /// 离园时间
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_time: Option<NaiveTime>,
    /// 随手记
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
    /// 缓存的活动数（由活动服务维护，列表展示用）
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub action_count: Option<u32>,
    /// 缓存的照片数（由活动服务维护；派生值，导出时剔除）
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub photo_count: Option<u32>,
}

impl Visit {
    /// 按入园/离园时间推导的游园时长（分钟）
    ///
    /// 两个时间都存在且差值为正时才有值；缺任意一个或差值非正视为未记录。
    pub fn duration_minutes(&self) -> Option<i64> {
        let start = self.start_time?;
        let end = self.end_time?;
        let minutes = (end - start).num_minutes();
        if minutes > 0 {
            Some(minutes)
        } else {
            None
        }
    }
}

/// 新建游园记录的输入（ID 与缓存计数由服务生成）
#[derive(Debug, Clone)]
pub struct VisitDraft {
    pub date: NaiveDate,
    pub park: Park,
    pub companion_ids: Vec<String>,
    pub pass_type: Option<PassType>,
    pub weather: Option<Weather>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

impl VisitDraft {
    /// 最小输入：日期 + 乐园，其余字段留空
    pub fn new(date: NaiveDate, park: Park) -> Self {
        Self {
            date,
            park,
            companion_ids: Vec::new(),
            pass_type: None,
            weather: None,
            start_time: None,
            end_time: None,
            notes: None,
        }
    }
}
