//! 游园记录模块

pub mod dao;
pub mod models;
pub mod service;

// 重新导出主要类型和函数
pub use dao::VisitDao;
pub use models::{Visit, VisitDraft};
pub use service::VisitService;
