//! 时间线活动模块

pub mod dao;
pub mod models;
pub mod service;

// 重新导出主要类型和函数
pub use dao::ActionDao;
pub use models::{ActionDetails, ActionDraft, Photo, TimelineAction};
pub use service::ActionService;
