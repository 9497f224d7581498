//! 游园记录业务服务
//!
//! 负责游园记录的增删改查与 visit→companion 边表维护。
//! 边表以游园记录侧为权威，伙伴侧的游园列表由伙伴服务按需推导。

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::journal::listener::{EmptyJournalListener, JournalListener};
use crate::journal::store::JournalStore;
use crate::journal::visit::models::{Visit, VisitDraft};

/// 游园记录服务
pub struct VisitService {
    store: Arc<dyn JournalStore>,
    listener: Arc<dyn JournalListener>,
}

impl VisitService {
    /// 创建新的游园记录服务（使用默认空监听器）
    pub fn new(store: Arc<dyn JournalStore>) -> Self {
        Self::with_listener(store, Arc::new(EmptyJournalListener))
    }

    /// 创建新的游园记录服务（带自定义监听器）
    pub fn with_listener(
        store: Arc<dyn JournalStore>,
        listener: Arc<dyn JournalListener>,
    ) -> Self {
        Self { store, listener }
    }

    /// 新建游园记录
    ///
    /// 引用了不存在的伙伴只告警不拒绝；悬空 ID 会被统计引擎跳过。
    pub async fn record_visit(&self, draft: VisitDraft) -> Result<Visit> {
        for companion_id in &draft.companion_ids {
            if self.store.get_companion(companion_id).await?.is_none() {
                warn!(
                    "[VisitSvc] ⚠️ 游园记录引用了不存在的伙伴: {}",
                    companion_id
                );
            }
        }

        let visit = Visit {
            id: Uuid::new_v4().to_string(),
            date: draft.date,
            park: draft.park,
            companion_ids: draft.companion_ids,
            pass_type: draft.pass_type,
            weather: draft.weather,
            start_time: draft.start_time,
            end_time: draft.end_time,
            notes: draft.notes,
            action_count: Some(0),
            photo_count: Some(0),
        };
        self.store.upsert_visit(&visit).await?;

        info!(
            "[VisitSvc] ✅ 新建游园记录 {}（{} / {}）",
            visit.id,
            visit.date,
            visit.park.display_name()
        );
        self.notify_visit_list_changed().await;
        Ok(visit)
    }

    /// 整条更新游园记录
    pub async fn update_visit(&self, visit: &Visit) -> Result<()> {
        if self.store.get_visit(&visit.id).await?.is_none() {
            return Err(anyhow::anyhow!("游园记录不存在: {}", visit.id));
        }
        self.store.upsert_visit(visit).await?;
        debug!("[VisitSvc] 更新游园记录 {}", visit.id);
        self.notify_visit_list_changed().await;
        Ok(())
    }

    /// 删除游园记录
    ///
    /// 存储层不做级联，这里先显式删掉该游园的全部时间线活动。
    pub async fn delete_visit(&self, visit_id: &str) -> Result<()> {
        let removed = self.store.delete_actions_by_visit(visit_id).await?;
        self.store.delete_visit(visit_id).await?;

        info!(
            "[VisitSvc] ✅ 删除游园记录 {}，级联删除活动 {} 条",
            visit_id, removed
        );
        self.listener
            .on_timeline_changed(visit_id.to_string(), "[]".to_string())
            .await;
        self.notify_visit_list_changed().await;
        Ok(())
    }

    /// 把伙伴挂到游园记录的边表上（已在表内则为幂等空操作）
    pub async fn add_companion_to_visit(&self, visit_id: &str, companion_id: &str) -> Result<()> {
        let mut visit = self
            .store
            .get_visit(visit_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("游园记录不存在: {}", visit_id))?;

        if visit.companion_ids.iter().any(|id| id == companion_id) {
            debug!(
                "[VisitSvc] 伙伴 {} 已在游园 {} 的边表内，跳过",
                companion_id, visit_id
            );
            return Ok(());
        }
        if self.store.get_companion(companion_id).await?.is_none() {
            warn!("[VisitSvc] ⚠️ 挂接了不存在的伙伴: {}", companion_id);
        }

        visit.companion_ids.push(companion_id.to_string());
        self.store.upsert_visit(&visit).await?;
        debug!(
            "[VisitSvc] 伙伴 {} 挂接到游园 {}，边表现有 {} 位",
            companion_id,
            visit_id,
            visit.companion_ids.len()
        );
        self.notify_visit_list_changed().await;
        Ok(())
    }

    /// 把伙伴从游园记录的边表上摘除（不在表内则为幂等空操作）
    pub async fn remove_companion_from_visit(
        &self,
        visit_id: &str,
        companion_id: &str,
    ) -> Result<()> {
        let mut visit = self
            .store
            .get_visit(visit_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("游园记录不存在: {}", visit_id))?;

        let before = visit.companion_ids.len();
        visit.companion_ids.retain(|id| id != companion_id);
        if visit.companion_ids.len() == before {
            return Ok(());
        }

        self.store.upsert_visit(&visit).await?;
        debug!(
            "[VisitSvc] 伙伴 {} 从游园 {} 摘除",
            companion_id, visit_id
        );
        self.notify_visit_list_changed().await;
        Ok(())
    }

    /// 获取游园记录列表（分页），日期降序，同日按 ID 升序
    pub async fn list_visits(&self, offset: usize, count: usize) -> Result<Vec<Visit>> {
        debug!("[VisitSvc] 获取游园列表，偏移: {}, 数量: {}", offset, count);

        let mut list = self.store.get_all_visits().await?;
        list.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

        Ok(list.into_iter().skip(offset).take(count).collect())
    }

    /// 获取所有游园记录列表
    pub async fn get_all_visit_list(&self) -> Result<Vec<Visit>> {
        self.list_visits(0, usize::MAX).await
    }

    /// 按 ID 获取单条游园记录
    pub async fn get_visit(&self, visit_id: &str) -> Result<Option<Visit>> {
        self.store.get_visit(visit_id).await
    }

    async fn notify_visit_list_changed(&self) {
        match self.get_all_visit_list().await {
            Ok(list) => {
                let total = list.len() as i64;
                let json = serde_json::to_string(&list).unwrap_or_else(|_| "[]".to_string());
                self.listener.on_visit_list_changed(json).await;
                self.listener.on_total_visit_count_changed(total).await;
            }
            Err(e) => warn!("[VisitSvc] 推送游园列表变更失败: {}", e),
        }
    }
}
