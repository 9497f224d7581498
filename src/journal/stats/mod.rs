//! 统计模块
//!
//! 纯引擎负责计算，服务层负责从存储取数并套整体超时。

pub mod engine;
pub mod models;
pub mod service;

// 重新导出主要类型和函数
pub use engine::{compute_action_statistics, compute_visit_statistics, TOP_RANKING_LIMIT};
pub use models::{
    ActionFilter, ActionStatistics, AreaStat, AttractionRank, CompanionRank, Dashboard,
    MonthBucket, RestaurantRank, VisitFilter, VisitStatistics, YearBucket,
};
pub use service::{StatsService, DEFAULT_STATS_TIMEOUT_MS};
