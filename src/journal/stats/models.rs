//! 统计读模型与筛选条件

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::journal::types::{ActionCategory, Area, Park};

/// 游园记录筛选条件（各条件取与；`None` 表示不限制）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitFilter {
    /// 起始日期（含）
    pub start_date: Option<NaiveDate>,
    /// 截止日期（含）
    pub end_date: Option<NaiveDate>,
    pub park: Option<Park>,
    /// 至少包含其中一位伙伴即命中；空列表视为不限制
    pub companion_ids: Vec<String>,
}

/// 时间线活动筛选条件（各条件取与；`None` 表示不限制）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionFilter {
    pub visit_id: Option<String>,
    pub category: Option<ActionCategory>,
    pub area: Option<Area>,
    /// 起始日期（含），按活动发生时间的日期部分比较
    pub start_date: Option<NaiveDate>,
    /// 截止日期（含）
    pub end_date: Option<NaiveDate>,
    /// 地点名包含该子串（区分大小写）
    pub location_contains: Option<String>,
}

/// 伙伴同行排行的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionRank {
    pub companion_id: String,
    pub name: String,
    pub count: u64,
}

/// 月度分布的一个桶（键形如 "2024-01"；无记录的月份不出现）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    pub month: String,
    pub count: u64,
}

/// 年度分布的一个桶（无记录的年份不出现）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearBucket {
    pub year: i32,
    pub count: u64,
}

/// 游园维度的统计结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStatistics {
    pub total_visits: u64,
    /// 只包含出现过的乐园，缺席即为 0
    pub count_by_park: BTreeMap<Park, u64>,
    /// 平均游园时长（分钟）；没有任何可用时长时缺席
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub average_duration_minutes: Option<f64>,
    /// 同行次数排行：计数降序，同数按名称升序
    pub companion_ranking: Vec<CompanionRank>,
    /// 月度分布，按月份升序
    pub visits_by_month: Vec<MonthBucket>,
    /// 年度分布，按年份升序
    pub visits_by_year: Vec<YearBucket>,
}

/// 设施排行的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttractionRank {
    pub location: String,
    pub count: u64,
    /// 平均排队等待（分钟）；该地点没有任何等待记录时缺席，不作 0 处理
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub average_wait_minutes: Option<f64>,
}

/// 餐厅排行的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRank {
    pub location: String,
    pub count: u64,
}

/// 区域分布的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaStat {
    pub area: Area,
    pub count: u64,
    /// 占筛选集的百分比，四舍五入到一位小数
    pub percentage: f64,
    /// 区域内有记录的体验时长合计（分钟）；全都未记录时缺席
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_minutes: Option<i64>,
}

/// 活动维度的统计结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStatistics {
    pub total_actions: u64,
    /// 只包含出现过的类别，缺席即为 0；各值之和等于 total_actions
    pub count_by_category: BTreeMap<ActionCategory, u64>,
    /// 游乐项目排行（至多 10 条）
    pub top_attractions: Vec<AttractionRank>,
    /// 餐厅排行（至多 10 条）
    pub top_restaurants: Vec<RestaurantRank>,
    /// 区域分布：计数降序，同数按区域标识升序
    pub area_distribution: Vec<AreaStat>,
    /// 场均活动数；筛选集为空时为 0.0
    pub average_actions_per_visit: f64,
    pub total_photos: u64,
}

/// 仪表盘：游园与活动两个维度一次取齐
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub visits: VisitStatistics,
    pub actions: ActionStatistics,
}
