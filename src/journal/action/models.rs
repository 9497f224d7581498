//! 时间线活动本地模型定义

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::journal::types::{ActionCategory, Area, MealType};

/// 活动照片（只存 URI 引用，不存二进制）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    /// 设备相册里的资源地址
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thumbnail_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub taken_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub caption: Option<String>,
}

/// 按类别区分的活动扩展字段
///
/// 以 `category` 为判别标签，序列化后与活动公共字段平铺在同一个
/// JSON 对象里，标签取值与 [`ActionCategory`] 的 camelCase 文本一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum ActionDetails {
    /// 游乐项目
    #[serde(rename_all = "camelCase")]
    Attraction {
        /// 是否使用了快速通行
        #[serde(default)]
        used_priority_pass: bool,
    },
    /// 餐饮
    #[serde(rename_all = "camelCase")]
    Restaurant {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        meal_type: Option<MealType>,
        /// 消费金额
        #[serde(skip_serializing_if = "Option::is_none", default)]
        amount: Option<f64>,
    },
    /// 演出
    #[serde(rename_all = "camelCase")]
    Show {
        /// 出演者
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        performers: Vec<String>,
    },
    /// 角色互动
    #[serde(rename_all = "camelCase")]
    Greeting {
        /// 见到的角色
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        characters: Vec<String>,
    },
    /// 购物
    #[serde(rename_all = "camelCase")]
    Shopping {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        amount: Option<f64>,
        /// 买到的东西
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        items: Vec<String>,
    },
}

impl ActionDetails {
    pub fn category(&self) -> ActionCategory {
        match self {
            ActionDetails::Attraction { .. } => ActionCategory::Attraction,
            ActionDetails::Restaurant { .. } => ActionCategory::Restaurant,
            ActionDetails::Show { .. } => ActionCategory::Show,
            ActionDetails::Greeting { .. } => ActionCategory::Greeting,
            ActionDetails::Shopping { .. } => ActionCategory::Shopping,
        }
    }

    /// 该类别的空白扩展字段
    pub fn empty_for(category: ActionCategory) -> Self {
        match category {
            ActionCategory::Attraction => ActionDetails::Attraction {
                used_priority_pass: false,
            },
            ActionCategory::Restaurant => ActionDetails::Restaurant {
                meal_type: None,
                amount: None,
            },
            ActionCategory::Show => ActionDetails::Show {
                performers: Vec::new(),
            },
            ActionCategory::Greeting => ActionDetails::Greeting {
                characters: Vec::new(),
            },
            ActionCategory::Shopping => ActionDetails::Shopping {
                amount: None,
                items: Vec::new(),
            },
        }
    }
}

/// 时间线活动（一次游园中的一个条目）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineAction {
    pub id: String,
    /// 所属游园记录
    pub visit_id: String,
    /// 发生区域
    pub area: Area,
    /// 地点名称（设施、餐厅、商店等）
    pub location_name: String,
    /// 发生时间
    pub time: NaiveDateTime,
    /// 体验时长（分钟）
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duration_minutes: Option<i32>,
    /// 排队等待（分钟）
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub wait_minutes: Option<i32>,
    /// 1~5 星评分
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// 类别与类别专属字段（平铺进同一 JSON 对象）
    #[serde(flatten)]
    pub details: ActionDetails,
}

impl TimelineAction {
    pub fn category(&self) -> ActionCategory {
        self.details.category()
    }
}

/// 新建时间线活动的输入（ID 由服务生成）
#[derive(Debug, Clone)]
pub struct ActionDraft {
    pub visit_id: String,
    pub area: Area,
    pub location_name: String,
    pub time: NaiveDateTime,
    pub duration_minutes: Option<i32>,
    pub wait_minutes: Option<i32>,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub photos: Vec<Photo>,
    pub details: ActionDetails,
}

impl ActionDraft {
    /// 最小输入：归属、地点、时间与类别，其余字段留空
    pub fn new(
        visit_id: impl Into<String>,
        area: Area,
        location_name: impl Into<String>,
        time: NaiveDateTime,
        details: ActionDetails,
    ) -> Self {
        Self {
            visit_id: visit_id.into(),
            area,
            location_name: location_name.into(),
            time,
            duration_minutes: None,
            wait_minutes: None,
            rating: None,
            notes: None,
            photos: Vec::new(),
            details,
        }
    }
}
