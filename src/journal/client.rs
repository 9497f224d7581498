//! 记录本客户端核心实现模块
//!
//! 把存储、各业务服务、统计与迁移装配成一个面向调用方的门面。
//! UI 层（或 CLI）只持有这个客户端。

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::journal::action::models::{ActionDraft, Photo, TimelineAction};
use crate::journal::action::service::ActionService;
use crate::journal::companion::models::{Companion, CompanionProfile};
use crate::journal::companion::service::CompanionService;
use crate::journal::db::create_sqlite_pool_with_migration;
use crate::journal::listener::{EmptyJournalListener, JournalListener};
use crate::journal::migration::listener::{EmptyMigrationListener, MigrationListener};
use crate::journal::migration::models::{
    ImportReport, ImportState, MigrationError, SnapshotDocument, StorePreview,
};
use crate::journal::migration::service::MigrationService;
use crate::journal::stats::models::{
    ActionFilter, ActionStatistics, Dashboard, VisitFilter, VisitStatistics,
};
use crate::journal::stats::service::{StatsService, DEFAULT_STATS_TIMEOUT_MS};
use crate::journal::store::{JournalStore, SqliteJournalStore};
use crate::journal::visit::models::{Visit, VisitDraft};
use crate::journal::visit::service::VisitService;

/// 客户端配置
#[derive(Clone, Debug)]
pub struct JournalClientConfig {
    /// 本地 SQLite 数据库 URL
    ///
    /// 例如：`sqlite://parklog.db?mode=rwc`
    pub db_url: String,
    /// 仪表盘统计的整体超时（毫秒）
    pub stats_timeout_ms: u64,
}

impl JournalClientConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self {
            db_url: "sqlite://parklog.db?mode=rwc".to_string(),
            stats_timeout_ms: DEFAULT_STATS_TIMEOUT_MS,
        }
    }
}

impl Default for JournalClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 记录本客户端
#[derive(Clone)]
pub struct JournalClient {
    pub(crate) config: JournalClientConfig,
    store: Option<Arc<dyn JournalStore>>,
    visit_service: Option<Arc<VisitService>>,
    companion_service: Option<Arc<CompanionService>>,
    action_service: Option<Arc<ActionService>>,
    stats_service: Option<Arc<StatsService>>,
    migration_service: Option<Arc<MigrationService>>,
    journal_listener: Arc<dyn JournalListener>,
    migration_listener: Arc<dyn MigrationListener>,
}

impl JournalClient {
    /// 创建新的客户端
    /// - `config`: 客户端配置
    pub fn new(config: JournalClientConfig) -> Self {
        Self {
            config,
            store: None,
            visit_service: None,
            companion_service: None,
            action_service: None,
            stats_service: None,
            migration_service: None,
            journal_listener: Arc::new(EmptyJournalListener),
            migration_listener: Arc::new(EmptyMigrationListener),
        }
    }

    /// 注册记录本监听器
    ///
    /// 服务已就绪时用新监听器重建各服务，保持回调一致。
    pub fn set_journal_listener(&mut self, listener: Arc<dyn JournalListener>) {
        self.journal_listener = listener;
        if self.store.is_some() {
            self.rebuild_services();
        }
    }

    /// 注册迁移监听器
    pub fn set_migration_listener(&mut self, listener: Arc<dyn MigrationListener>) {
        self.migration_listener = listener;
        if self.store.is_some() {
            self.rebuild_services();
        }
    }

    /// 打开本地数据库并装配全部服务
    pub async fn connect(&mut self) -> Result<()> {
        info!("[Client] 🔗 打开本地数据库: {}", self.config.db_url);
        let pool = create_sqlite_pool_with_migration(&self.config.db_url).await?;
        let store: Arc<dyn JournalStore> = Arc::new(SqliteJournalStore::new(pool));
        self.attach_store(store);
        info!("[Client] ✅ 本地存储就绪，各服务已装配");
        Ok(())
    }

    /// 用外部注入的存储装配服务（测试与内存场景）
    pub fn attach_store(&mut self, store: Arc<dyn JournalStore>) {
        self.store = Some(store);
        self.rebuild_services();
    }

    fn rebuild_services(&mut self) {
        let Some(store) = self.store.clone() else {
            return;
        };
        self.visit_service = Some(Arc::new(VisitService::with_listener(
            store.clone(),
            self.journal_listener.clone(),
        )));
        self.companion_service = Some(Arc::new(CompanionService::with_listener(
            store.clone(),
            self.journal_listener.clone(),
        )));
        self.action_service = Some(Arc::new(ActionService::with_listener(
            store.clone(),
            self.journal_listener.clone(),
        )));
        self.stats_service = Some(Arc::new(StatsService::new(
            store.clone(),
            self.config.stats_timeout_ms,
        )));
        self.migration_service = Some(Arc::new(MigrationService::new(
            store,
            self.migration_listener.clone(),
        )));
    }

    // ===================== 游园记录 =====================

    /// 新建游园记录
    pub async fn record_visit(&self, draft: VisitDraft) -> Result<Visit> {
        let service = self
            .visit_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("游园服务未初始化"))?;
        service.record_visit(draft).await
    }

    /// 整条更新游园记录
    pub async fn update_visit(&self, visit: &Visit) -> Result<()> {
        let service = self
            .visit_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("游园服务未初始化"))?;
        service.update_visit(visit).await
    }

    /// 删除游园记录（连同其时间线活动）
    pub async fn delete_visit(&self, visit_id: &str) -> Result<()> {
        let service = self
            .visit_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("游园服务未初始化"))?;
        service.delete_visit(visit_id).await
    }

    /// 把伙伴挂到游园记录上
    pub async fn add_companion_to_visit(&self, visit_id: &str, companion_id: &str) -> Result<()> {
        let service = self
            .visit_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("游园服务未初始化"))?;
        service.add_companion_to_visit(visit_id, companion_id).await
    }

    /// 把伙伴从游园记录上摘除
    pub async fn remove_companion_from_visit(
        &self,
        visit_id: &str,
        companion_id: &str,
    ) -> Result<()> {
        let service = self
            .visit_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("游园服务未初始化"))?;
        service
            .remove_companion_from_visit(visit_id, companion_id)
            .await
    }

    /// 获取游园记录列表（分页），日期降序
    pub async fn get_visit_list(&self, offset: usize, count: usize) -> Result<Vec<Visit>> {
        let service = self
            .visit_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("游园服务未初始化"))?;
        service.list_visits(offset, count).await
    }

    /// 获取所有游园记录
    pub async fn get_all_visits(&self) -> Result<Vec<Visit>> {
        let service = self
            .visit_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("游园服务未初始化"))?;
        service.get_all_visit_list().await
    }

    /// 按 ID 获取单条游园记录
    pub async fn get_visit(&self, visit_id: &str) -> Result<Option<Visit>> {
        let service = self
            .visit_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("游园服务未初始化"))?;
        service.get_visit(visit_id).await
    }

    // ===================== 同行伙伴 =====================

    /// 新建同行伙伴
    pub async fn add_companion(&self, name: &str) -> Result<Companion> {
        let service = self
            .companion_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("伙伴服务未初始化"))?;
        service.add_companion(name).await
    }

    /// 重命名同行伙伴
    pub async fn rename_companion(&self, companion_id: &str, name: &str) -> Result<Companion> {
        let service = self
            .companion_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("伙伴服务未初始化"))?;
        service.rename_companion(companion_id, name).await
    }

    /// 删除同行伙伴（边表同步剥离）
    pub async fn delete_companion(&self, companion_id: &str) -> Result<()> {
        let service = self
            .companion_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("伙伴服务未初始化"))?;
        service.delete_companion(companion_id).await
    }

    /// 获取伙伴列表（名称升序）
    pub async fn get_all_companions(&self) -> Result<Vec<Companion>> {
        let service = self
            .companion_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("伙伴服务未初始化"))?;
        service.list_companions().await
    }

    /// 伙伴汇总视图（含推导出的游园 ID 列表）
    pub async fn get_companion_profile(&self, companion_id: &str) -> Result<CompanionProfile> {
        let service = self
            .companion_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("伙伴服务未初始化"))?;
        service.get_profile(companion_id).await
    }

    // ===================== 时间线活动 =====================

    /// 新增时间线活动
    pub async fn add_action(&self, draft: ActionDraft) -> Result<TimelineAction> {
        let service = self
            .action_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("活动服务未初始化"))?;
        service.add_action(draft).await
    }

    /// 整条更新时间线活动
    pub async fn update_action(&self, action: &TimelineAction) -> Result<()> {
        let service = self
            .action_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("活动服务未初始化"))?;
        service.update_action(action).await
    }

    /// 删除时间线活动
    pub async fn delete_action(&self, action_id: &str) -> Result<()> {
        let service = self
            .action_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("活动服务未初始化"))?;
        service.delete_action(action_id).await
    }

    /// 某次游园的时间线（发生时间升序）
    pub async fn get_timeline(&self, visit_id: &str) -> Result<Vec<TimelineAction>> {
        let service = self
            .action_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("活动服务未初始化"))?;
        service.timeline_for_visit(visit_id).await
    }

    /// 给活动追加照片
    pub async fn add_photo(&self, action_id: &str, photo: Photo) -> Result<TimelineAction> {
        let service = self
            .action_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("活动服务未初始化"))?;
        service.add_photo(action_id, photo).await
    }

    /// 从活动上摘除照片
    pub async fn remove_photo(&self, action_id: &str, photo_id: &str) -> Result<TimelineAction> {
        let service = self
            .action_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("活动服务未初始化"))?;
        service.remove_photo(action_id, photo_id).await
    }

    // ===================== 统计 =====================

    /// 游园维度统计
    pub async fn get_visit_statistics(&self, filter: &VisitFilter) -> Result<VisitStatistics> {
        let service = self
            .stats_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("统计服务未初始化"))?;
        service.visit_statistics(filter).await
    }

    /// 活动维度统计
    pub async fn get_action_statistics(&self, filter: &ActionFilter) -> Result<ActionStatistics> {
        let service = self
            .stats_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("统计服务未初始化"))?;
        service.action_statistics(filter).await
    }

    /// 仪表盘（带整体超时）
    pub async fn get_dashboard(&self) -> Result<Dashboard> {
        let service = self
            .stats_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("统计服务未初始化"))?;
        service.dashboard().await
    }

    // ===================== 迁移 =====================

    /// 导出全量快照
    pub async fn export_snapshot(&self) -> Result<SnapshotDocument> {
        let service = self
            .migration_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("迁移服务未初始化"))?;
        service.export_snapshot().await
    }

    /// 从快照文档整体导入
    pub async fn import_snapshot(
        &self,
        document: serde_json::Value,
    ) -> Result<ImportReport, MigrationError> {
        let service = self.migration_service.as_ref().ok_or_else(|| {
            MigrationError::Storage(anyhow::anyhow!("迁移服务未初始化"))
        })?;
        service.import_snapshot(document).await
    }

    /// 导入前的本地存量预览
    pub async fn get_store_preview(&self) -> Result<StorePreview> {
        let service = self
            .migration_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("迁移服务未初始化"))?;
        service.get_preview_counts().await
    }

    /// 当前导入状态
    pub async fn import_state(&self) -> Result<ImportState> {
        let service = self
            .migration_service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("迁移服务未初始化"))?;
        Ok(service.import_state().await)
    }
}
