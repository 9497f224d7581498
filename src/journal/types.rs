//! 手帐共享枚举类型：乐园、园区、活动分类等
//!
//! 所有枚举同时参与三种表示：serde JSON（camelCase）、SQLite TEXT 列
//! （strum Display/FromStr，与 serde 命名保持一致）、以及 CLI 展示用的中文名。

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// 乐园标识（两座乐园）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Park {
    /// 陆上乐园
    Land,
    /// 海洋乐园
    Sea,
}

impl Park {
    /// 中文展示名
    pub fn display_name(&self) -> &'static str {
        match self {
            Park::Land => "陆上乐园",
            Park::Sea => "海洋乐园",
        }
    }

    /// 该乐园下属的全部园区
    pub fn areas(&self) -> &'static [Area] {
        match self {
            Park::Land => &[
                Area::EntranceStreet,
                Area::Adventureland,
                Area::Westernland,
                Area::Fantasyland,
                Area::Tomorrowland,
                Area::Toontown,
            ],
            Park::Sea => &[
                Area::MediterraneanHarbor,
                Area::MysteriousIsland,
                Area::MermaidLagoon,
                Area::ArabianCoast,
                Area::LostRiverDelta,
                Area::PortDiscovery,
                Area::AmericanWaterfront,
            ],
        }
    }
}

/// 园区（乐园内的分区，各乐园园区互不相同）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Area {
    // 陆上乐园
    EntranceStreet,
    Adventureland,
    Westernland,
    Fantasyland,
    Tomorrowland,
    Toontown,
    // 海洋乐园
    MediterraneanHarbor,
    MysteriousIsland,
    MermaidLagoon,
    ArabianCoast,
    LostRiverDelta,
    PortDiscovery,
    AmericanWaterfront,
}

impl Area {
    /// 园区所属的乐园
    pub fn park(&self) -> Park {
        match self {
            Area::EntranceStreet
            | Area::Adventureland
            | Area::Westernland
            | Area::Fantasyland
            | Area::Tomorrowland
            | Area::Toontown => Park::Land,
            Area::MediterraneanHarbor
            | Area::MysteriousIsland
            | Area::MermaidLagoon
            | Area::ArabianCoast
            | Area::LostRiverDelta
            | Area::PortDiscovery
            | Area::AmericanWaterfront => Park::Sea,
        }
    }

    /// 中文展示名
    pub fn display_name(&self) -> &'static str {
        match self {
            Area::EntranceStreet => "入口大街",
            Area::Adventureland => "冒险园区",
            Area::Westernland => "西部园区",
            Area::Fantasyland => "梦幻园区",
            Area::Tomorrowland => "明日园区",
            Area::Toontown => "卡通城",
            Area::MediterraneanHarbor => "地中海港湾",
            Area::MysteriousIsland => "神秘岛",
            Area::MermaidLagoon => "美人鱼礁湖",
            Area::ArabianCoast => "阿拉伯海岸",
            Area::LostRiverDelta => "失落河三角洲",
            Area::PortDiscovery => "发现港",
            Area::AmericanWaterfront => "美国海滨",
        }
    }
}

/// 时间线活动分类（五类）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ActionCategory {
    /// 游乐项目
    Attraction,
    /// 餐饮
    Restaurant,
    /// 演出
    Show,
    /// 角色见面
    Greeting,
    /// 购物
    Shopping,
}

impl ActionCategory {
    /// 中文展示名
    pub fn display_name(&self) -> &'static str {
        match self {
            ActionCategory::Attraction => "游乐项目",
            ActionCategory::Restaurant => "餐饮",
            ActionCategory::Show => "演出",
            ActionCategory::Greeting => "角色见面",
            ActionCategory::Shopping => "购物",
        }
    }
}

/// 门票类型
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PassType {
    /// 一日票
    OneDay,
    /// 两日票
    TwoDay,
    /// 年卡
    Annual,
    /// 傍晚票
    Evening,
}

/// 当日天气
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Weather {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

/// 用餐类型（餐饮活动专用）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}
