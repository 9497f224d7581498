//! 同行伙伴业务服务
//!
//! 伙伴本体只存名称；同行过哪些游园由 visit 侧的边表现场推导，
//! 不另存反向索引，也就不存在两份数据相互漂移的问题。

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::journal::companion::models::{Companion, CompanionProfile};
use crate::journal::listener::{EmptyJournalListener, JournalListener};
use crate::journal::store::JournalStore;

/// 同行伙伴服务
pub struct CompanionService {
    store: Arc<dyn JournalStore>,
    listener: Arc<dyn JournalListener>,
}

impl CompanionService {
    /// 创建新的同行伙伴服务（使用默认空监听器）
    pub fn new(store: Arc<dyn JournalStore>) -> Self {
        Self::with_listener(store, Arc::new(EmptyJournalListener))
    }

    /// 创建新的同行伙伴服务（带自定义监听器）
    pub fn with_listener(
        store: Arc<dyn JournalStore>,
        listener: Arc<dyn JournalListener>,
    ) -> Self {
        Self { store, listener }
    }

    /// 新建同行伙伴
    pub async fn add_companion(&self, name: &str) -> Result<Companion> {
        let name = name.trim();
        if name.is_empty() {
            return Err(anyhow::anyhow!("伙伴名称不能为空"));
        }

        let companion = Companion {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now().timestamp_millis(),
        };
        self.store.upsert_companion(&companion).await?;

        info!("[CompanionSvc] ✅ 新建伙伴 {}（{}）", companion.name, companion.id);
        self.notify_companion_list_changed().await;
        Ok(companion)
    }

    /// 重命名同行伙伴
    pub async fn rename_companion(&self, companion_id: &str, name: &str) -> Result<Companion> {
        let name = name.trim();
        if name.is_empty() {
            return Err(anyhow::anyhow!("伙伴名称不能为空"));
        }

        let mut companion = self
            .store
            .get_companion(companion_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("同行伙伴不存在: {}", companion_id))?;
        companion.name = name.to_string();
        self.store.upsert_companion(&companion).await?;

        debug!("[CompanionSvc] 重命名伙伴 {} -> {}", companion_id, name);
        self.notify_companion_list_changed().await;
        Ok(companion)
    }

    /// 删除同行伙伴
    ///
    /// 先把该伙伴从每条游园记录的边表上剥离，再删除本体，
    /// 保证边表不会留下悬空 ID。
    pub async fn delete_companion(&self, companion_id: &str) -> Result<()> {
        let visits = self.store.get_all_visits().await?;
        let mut touched = 0usize;
        for mut visit in visits {
            let before = visit.companion_ids.len();
            visit.companion_ids.retain(|id| id != companion_id);
            if visit.companion_ids.len() != before {
                self.store.upsert_visit(&visit).await?;
                touched += 1;
            }
        }

        self.store.delete_companion(companion_id).await?;
        info!(
            "[CompanionSvc] ✅ 删除伙伴 {}，从 {} 条游园记录剥离",
            companion_id, touched
        );
        self.notify_companion_list_changed().await;
        Ok(())
    }

    /// 伙伴列表：名称升序，同名按 ID 升序
    pub async fn list_companions(&self) -> Result<Vec<Companion>> {
        let mut list = self.store.get_all_companions().await?;
        list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }

    /// 按 ID 获取单个同行伙伴
    pub async fn get_companion(&self, companion_id: &str) -> Result<Option<Companion>> {
        self.store.get_companion(companion_id).await
    }

    /// 伙伴同行过的游园 ID 列表，日期降序
    ///
    /// 扫描边表现场推导，而不是读某个持久化的反向索引。
    pub async fn visit_ids_for(&self, companion_id: &str) -> Result<Vec<String>> {
        let mut visits: Vec<_> = self
            .store
            .get_all_visits()
            .await?
            .into_iter()
            .filter(|v| v.companion_ids.iter().any(|id| id == companion_id))
            .collect();
        visits.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(visits.into_iter().map(|v| v.id).collect())
    }

    /// 伙伴汇总视图（本体 + 推导出的游园列表）
    pub async fn get_profile(&self, companion_id: &str) -> Result<CompanionProfile> {
        let companion = self
            .store
            .get_companion(companion_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("同行伙伴不存在: {}", companion_id))?;
        let visit_ids = self.visit_ids_for(companion_id).await?;
        Ok(CompanionProfile {
            visit_count: visit_ids.len() as u32,
            companion,
            visit_ids,
        })
    }

    async fn notify_companion_list_changed(&self) {
        match self.list_companions().await {
            Ok(list) => {
                let json = serde_json::to_string(&list).unwrap_or_else(|_| "[]".to_string());
                self.listener.on_companion_list_changed(json).await;
            }
            Err(e) => warn!("[CompanionSvc] 推送伙伴列表变更失败: {}", e),
        }
    }
}
