//! 迁移模块
//!
//! 设备间手工迁移：全量快照导出 / 两阶段校验导入。

pub mod listener;
pub mod models;
pub mod service;

// 重新导出主要类型和函数
pub use listener::{EmptyMigrationListener, MigrationListener};
pub use models::{
    ImportReport, ImportState, MigrationError, SnapshotAction, SnapshotDocument,
    SnapshotMetadata, StorePreview, PHOTO_EXCLUSION_NOTE, SNAPSHOT_VERSION,
};
pub use service::MigrationService;
