//! SQLite 存储实现
//!
//! 把 [`JournalStore`] 的各集合操作委托给对应的 DAO。

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::journal::action::dao::ActionDao;
use crate::journal::action::models::TimelineAction;
use crate::journal::companion::dao::CompanionDao;
use crate::journal::companion::models::Companion;
use crate::journal::store::JournalStore;
use crate::journal::visit::dao::VisitDao;
use crate::journal::visit::models::Visit;

/// 基于 SQLite 的记录存储
pub struct SqliteJournalStore {
    visits: VisitDao,
    companions: CompanionDao,
    actions: ActionDao,
}

impl SqliteJournalStore {
    /// 用已完成迁移的连接池创建存储
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self {
            visits: VisitDao::new(db.clone()),
            companions: CompanionDao::new(db.clone()),
            actions: ActionDao::new(db),
        }
    }
}

#[async_trait]
impl JournalStore for SqliteJournalStore {
    async fn get_all_visits(&self) -> Result<Vec<Visit>> {
        self.visits.get_all_visits().await
    }

    async fn get_visit(&self, visit_id: &str) -> Result<Option<Visit>> {
        self.visits.get_visit(visit_id).await
    }

    async fn upsert_visit(&self, visit: &Visit) -> Result<()> {
        self.visits.upsert_visit(visit).await
    }

    async fn delete_visit(&self, visit_id: &str) -> Result<()> {
        self.visits.delete_visit(visit_id).await
    }

    async fn clear_visits(&self) -> Result<()> {
        self.visits.clear_visits().await
    }

    async fn get_all_companions(&self) -> Result<Vec<Companion>> {
        self.companions.get_all_companions().await
    }

    async fn get_companion(&self, companion_id: &str) -> Result<Option<Companion>> {
        self.companions.get_companion(companion_id).await
    }

    async fn upsert_companion(&self, companion: &Companion) -> Result<()> {
        self.companions.upsert_companion(companion).await
    }

    async fn delete_companion(&self, companion_id: &str) -> Result<()> {
        self.companions.delete_companion(companion_id).await
    }

    async fn clear_companions(&self) -> Result<()> {
        self.companions.clear_companions().await
    }

    async fn get_all_actions(&self) -> Result<Vec<TimelineAction>> {
        self.actions.get_all_actions().await
    }

    async fn get_action(&self, action_id: &str) -> Result<Option<TimelineAction>> {
        self.actions.get_action(action_id).await
    }

    async fn get_actions_by_visit(&self, visit_id: &str) -> Result<Vec<TimelineAction>> {
        self.actions.get_actions_by_visit(visit_id).await
    }

    async fn upsert_action(&self, action: &TimelineAction) -> Result<()> {
        self.actions.upsert_action(action).await
    }

    async fn delete_action(&self, action_id: &str) -> Result<()> {
        self.actions.delete_action(action_id).await
    }

    async fn delete_actions_by_visit(&self, visit_id: &str) -> Result<u64> {
        self.actions.delete_actions_by_visit(visit_id).await
    }

    async fn clear_actions(&self) -> Result<()> {
        self.actions.clear_actions().await
    }
}
