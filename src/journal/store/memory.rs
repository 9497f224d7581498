//! 内存存储实现
//!
//! 单元测试与统计引擎验证用，不依赖 SQLite。BTreeMap 保证
//! 遍历顺序按 ID 稳定，与 SQLite 实现的 ORDER BY 行为一致。

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::journal::action::models::TimelineAction;
use crate::journal::companion::models::Companion;
use crate::journal::store::JournalStore;
use crate::journal::visit::models::Visit;

/// 纯内存的记录存储
#[derive(Default)]
pub struct MemoryJournalStore {
    visits: RwLock<BTreeMap<String, Visit>>,
    companions: RwLock<BTreeMap<String, Companion>>,
    actions: RwLock<BTreeMap<String, TimelineAction>>,
}

impl MemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JournalStore for MemoryJournalStore {
    async fn get_all_visits(&self) -> Result<Vec<Visit>> {
        let mut visits: Vec<Visit> = self.visits.read().await.values().cloned().collect();
        visits.sort_by(|a, b| (a.date, &a.id).cmp(&(b.date, &b.id)));
        Ok(visits)
    }

    async fn get_visit(&self, visit_id: &str) -> Result<Option<Visit>> {
        Ok(self.visits.read().await.get(visit_id).cloned())
    }

    async fn upsert_visit(&self, visit: &Visit) -> Result<()> {
        self.visits
            .write()
            .await
            .insert(visit.id.clone(), visit.clone());
        Ok(())
    }

    async fn delete_visit(&self, visit_id: &str) -> Result<()> {
        self.visits.write().await.remove(visit_id);
        Ok(())
    }

    async fn clear_visits(&self) -> Result<()> {
        self.visits.write().await.clear();
        Ok(())
    }

    async fn get_all_companions(&self) -> Result<Vec<Companion>> {
        Ok(self.companions.read().await.values().cloned().collect())
    }

    async fn get_companion(&self, companion_id: &str) -> Result<Option<Companion>> {
        Ok(self.companions.read().await.get(companion_id).cloned())
    }

    async fn upsert_companion(&self, companion: &Companion) -> Result<()> {
        self.companions
            .write()
            .await
            .insert(companion.id.clone(), companion.clone());
        Ok(())
    }

    async fn delete_companion(&self, companion_id: &str) -> Result<()> {
        self.companions.write().await.remove(companion_id);
        Ok(())
    }

    async fn clear_companions(&self) -> Result<()> {
        self.companions.write().await.clear();
        Ok(())
    }

    async fn get_all_actions(&self) -> Result<Vec<TimelineAction>> {
        let mut actions: Vec<TimelineAction> =
            self.actions.read().await.values().cloned().collect();
        actions.sort_by(|a, b| (a.time, &a.id).cmp(&(b.time, &b.id)));
        Ok(actions)
    }

    async fn get_action(&self, action_id: &str) -> Result<Option<TimelineAction>> {
        Ok(self.actions.read().await.get(action_id).cloned())
    }

    async fn get_actions_by_visit(&self, visit_id: &str) -> Result<Vec<TimelineAction>> {
        let mut actions: Vec<TimelineAction> = self
            .actions
            .read()
            .await
            .values()
            .filter(|a| a.visit_id == visit_id)
            .cloned()
            .collect();
        actions.sort_by(|a, b| (a.time, &a.id).cmp(&(b.time, &b.id)));
        Ok(actions)
    }

    async fn upsert_action(&self, action: &TimelineAction) -> Result<()> {
        self.actions
            .write()
            .await
            .insert(action.id.clone(), action.clone());
        Ok(())
    }

    async fn delete_action(&self, action_id: &str) -> Result<()> {
        self.actions.write().await.remove(action_id);
        Ok(())
    }

    async fn delete_actions_by_visit(&self, visit_id: &str) -> Result<u64> {
        let mut actions = self.actions.write().await;
        let ids: Vec<String> = actions
            .values()
            .filter(|a| a.visit_id == visit_id)
            .map(|a| a.id.clone())
            .collect();
        for id in &ids {
            actions.remove(id);
        }
        Ok(ids.len() as u64)
    }

    async fn clear_actions(&self) -> Result<()> {
        self.actions.write().await.clear();
        Ok(())
    }
}
