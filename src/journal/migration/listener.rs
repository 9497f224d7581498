//! 迁移监听器回调接口

use async_trait::async_trait;

use crate::journal::migration::models::ImportState;

/// 迁移监听器回调接口
#[async_trait]
pub trait MigrationListener: Send + Sync {
    /// 导入状态机发生迁转
    async fn on_import_state_changed(&self, state: ImportState);

    /// 导入进度（10/50/80/100）
    async fn on_import_progress(&self, progress: i32);

    /// 导入完成，负载为 ImportReport 的 JSON
    async fn on_import_finish(&self, report: String);

    /// 导入失败，负载为错误信息列表的 JSON
    async fn on_import_failed(&self, errors: String);

    /// 导出完成，负载为 SnapshotMetadata 的 JSON
    async fn on_export_finish(&self, metadata: String);
}

/// 空实现（默认监听器）
pub struct EmptyMigrationListener;

#[async_trait]
impl MigrationListener for EmptyMigrationListener {
    async fn on_import_state_changed(&self, _state: ImportState) {}
    async fn on_import_progress(&self, _progress: i32) {}
    async fn on_import_finish(&self, _report: String) {}
    async fn on_import_failed(&self, _errors: String) {}
    async fn on_export_finish(&self, _metadata: String) {}
}
