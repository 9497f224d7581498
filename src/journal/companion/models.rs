//! 同行伙伴本地模型定义

use serde::{Deserialize, Serialize};

/// 同行伙伴（家人、朋友等，可跨多次游园复用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Companion {
    pub id: String,
    /// 显示名称
    pub name: String,
    /// 创建时间（Unix 毫秒）
    #[serde(default)]
    pub created_at: i64,
}

/// 伙伴与其游园记录的汇总视图（visit 列表按边表推导，不落库）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionProfile {
    pub companion: Companion,
    /// 同行过的游园记录 ID，按日期降序
    pub visit_ids: Vec<String>,
    pub visit_count: u32,
}
