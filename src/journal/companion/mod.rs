//! 同行伙伴模块

pub mod dao;
pub mod models;
pub mod service;

// 重新导出主要类型和函数
pub use dao::CompanionDao;
pub use models::{Companion, CompanionProfile};
pub use service::CompanionService;
