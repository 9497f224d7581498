//! 时间线活动业务服务
//!
//! 活动必须挂在已存在的游园记录上（存储层不做引用约束，约束在这里）。
//! 每次活动或照片变动后，父游园缓存的活动数 / 照片数都会重算落库。

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::journal::action::models::{ActionDraft, Photo, TimelineAction};
use crate::journal::listener::{EmptyJournalListener, JournalListener};
use crate::journal::store::JournalStore;

/// 时间线活动服务
pub struct ActionService {
    store: Arc<dyn JournalStore>,
    listener: Arc<dyn JournalListener>,
}

impl ActionService {
    /// 创建新的时间线活动服务（使用默认空监听器）
    pub fn new(store: Arc<dyn JournalStore>) -> Self {
        Self::with_listener(store, Arc::new(EmptyJournalListener))
    }

    /// 创建新的时间线活动服务（带自定义监听器）
    pub fn with_listener(
        store: Arc<dyn JournalStore>,
        listener: Arc<dyn JournalListener>,
    ) -> Self {
        Self { store, listener }
    }

    fn validate_rating(rating: Option<u8>) -> Result<()> {
        if let Some(rating) = rating {
            if !(1..=5).contains(&rating) {
                return Err(anyhow::anyhow!("评分超出范围（1~5）: {}", rating));
            }
        }
        Ok(())
    }

    /// 新增时间线活动
    pub async fn add_action(&self, draft: ActionDraft) -> Result<TimelineAction> {
        // 1. 归属校验
        let visit = self
            .store
            .get_visit(&draft.visit_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("游园记录不存在: {}", draft.visit_id))?;

        // 2. 评分范围校验
        Self::validate_rating(draft.rating)?;

        // 3. 区域归属另一座乐园时只告警，照常入库
        if draft.area.park() != visit.park {
            warn!(
                "[ActionSvc] ⚠️ 区域「{}」属于{}，与本次游园的{}不一致",
                draft.area.display_name(),
                draft.area.park().display_name(),
                visit.park.display_name()
            );
        }

        let action = TimelineAction {
            id: Uuid::new_v4().to_string(),
            visit_id: draft.visit_id,
            area: draft.area,
            location_name: draft.location_name,
            time: draft.time,
            duration_minutes: draft.duration_minutes,
            wait_minutes: draft.wait_minutes,
            rating: draft.rating,
            notes: draft.notes,
            photos: draft.photos,
            details: draft.details,
        };
        self.store.upsert_action(&action).await?;
        self.refresh_visit_counters(&action.visit_id).await?;

        info!(
            "[ActionSvc] ✅ 新增活动 {}（{} / {}）",
            action.id,
            action.category(),
            action.location_name
        );
        self.notify_timeline_changed(&action.visit_id).await;
        Ok(action)
    }

    /// 整条更新时间线活动
    pub async fn update_action(&self, action: &TimelineAction) -> Result<()> {
        let existing = self
            .store
            .get_action(&action.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("时间线活动不存在: {}", action.id))?;
        Self::validate_rating(action.rating)?;
        if self.store.get_visit(&action.visit_id).await?.is_none() {
            return Err(anyhow::anyhow!("游园记录不存在: {}", action.visit_id));
        }

        self.store.upsert_action(action).await?;
        debug!("[ActionSvc] 更新活动 {}", action.id);

        // 活动可能换了归属，新旧两边的缓存计数都要刷
        self.refresh_visit_counters(&existing.visit_id).await?;
        if existing.visit_id != action.visit_id {
            self.refresh_visit_counters(&action.visit_id).await?;
            self.notify_timeline_changed(&existing.visit_id).await;
        }
        self.notify_timeline_changed(&action.visit_id).await;
        Ok(())
    }

    /// 删除时间线活动（不存在则为幂等空操作）
    pub async fn delete_action(&self, action_id: &str) -> Result<()> {
        let Some(existing) = self.store.get_action(action_id).await? else {
            debug!("[ActionSvc] 活动 {} 已不存在，跳过删除", action_id);
            return Ok(());
        };

        self.store.delete_action(action_id).await?;
        self.refresh_visit_counters(&existing.visit_id).await?;

        info!("[ActionSvc] ✅ 删除活动 {}", action_id);
        self.notify_timeline_changed(&existing.visit_id).await;
        Ok(())
    }

    /// 某次游园的时间线，发生时间升序
    pub async fn timeline_for_visit(&self, visit_id: &str) -> Result<Vec<TimelineAction>> {
        self.store.get_actions_by_visit(visit_id).await
    }

    /// 按 ID 获取单条时间线活动
    pub async fn get_action(&self, action_id: &str) -> Result<Option<TimelineAction>> {
        self.store.get_action(action_id).await
    }

    /// 给活动追加照片（同 ID 照片整条替换）
    pub async fn add_photo(&self, action_id: &str, photo: Photo) -> Result<TimelineAction> {
        let mut action = self
            .store
            .get_action(action_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("时间线活动不存在: {}", action_id))?;

        match action.photos.iter_mut().find(|p| p.id == photo.id) {
            Some(existing) => *existing = photo,
            None => action.photos.push(photo),
        }
        self.store.upsert_action(&action).await?;
        self.refresh_visit_counters(&action.visit_id).await?;

        debug!(
            "[ActionSvc] 活动 {} 的照片更新为 {} 张",
            action_id,
            action.photos.len()
        );
        self.notify_timeline_changed(&action.visit_id).await;
        Ok(action)
    }

    /// 从活动上摘除照片
    pub async fn remove_photo(&self, action_id: &str, photo_id: &str) -> Result<TimelineAction> {
        let mut action = self
            .store
            .get_action(action_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("时间线活动不存在: {}", action_id))?;

        action.photos.retain(|p| p.id != photo_id);
        self.store.upsert_action(&action).await?;
        self.refresh_visit_counters(&action.visit_id).await?;

        self.notify_timeline_changed(&action.visit_id).await;
        Ok(action)
    }

    /// 重算父游园缓存的活动数 / 照片数
    ///
    /// 父记录已被删除时静默跳过（级联删除路径会走到这里）。
    async fn refresh_visit_counters(&self, visit_id: &str) -> Result<()> {
        let Some(mut visit) = self.store.get_visit(visit_id).await? else {
            return Ok(());
        };

        let actions = self.store.get_actions_by_visit(visit_id).await?;
        visit.action_count = Some(actions.len() as u32);
        visit.photo_count = Some(actions.iter().map(|a| a.photos.len() as u32).sum());
        self.store.upsert_visit(&visit).await
    }

    async fn notify_timeline_changed(&self, visit_id: &str) {
        match self.store.get_actions_by_visit(visit_id).await {
            Ok(timeline) => {
                let json = serde_json::to_string(&timeline).unwrap_or_else(|_| "[]".to_string());
                self.listener
                    .on_timeline_changed(visit_id.to_string(), json)
                    .await;
            }
            Err(e) => warn!("[ActionSvc] 推送时间线变更失败: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::action::models::ActionDetails;
    use crate::journal::store::MemoryJournalStore;
    use crate::journal::types::{Area, MealType, Park};
    use crate::journal::visit::models::Visit;

    fn visit(id: &str, park: Park) -> Visit {
        Visit {
            id: id.to_string(),
            date: "2024-01-15".parse().unwrap(),
            park,
            companion_ids: vec![],
            pass_type: None,
            weather: None,
            start_time: None,
            end_time: None,
            notes: None,
            action_count: Some(0),
            photo_count: Some(0),
        }
    }

    fn draft(visit_id: &str, area: Area) -> ActionDraft {
        ActionDraft::new(
            visit_id,
            area,
            "カリブの海賊",
            "2024-01-15T10:00:00".parse().unwrap(),
            ActionDetails::Attraction {
                used_priority_pass: false,
            },
        )
    }

    fn photo(id: &str) -> Photo {
        Photo {
            id: id.to_string(),
            uri: format!("ph://{}", id),
            thumbnail_uri: None,
            width: None,
            height: None,
            taken_at: None,
            caption: None,
        }
    }

    #[tokio::test]
    async fn add_action_requires_existing_visit() {
        let service = ActionService::new(Arc::new(MemoryJournalStore::new()));
        let err = service
            .add_action(draft("missing", Area::Adventureland))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn rating_must_stay_in_range() {
        let store = Arc::new(MemoryJournalStore::new());
        store.upsert_visit(&visit("v1", Park::Land)).await.unwrap();
        let service = ActionService::new(store);

        let mut bad = draft("v1", Area::Adventureland);
        bad.rating = Some(6);
        assert!(service.add_action(bad).await.is_err());

        let mut zero = draft("v1", Area::Adventureland);
        zero.rating = Some(0);
        assert!(service.add_action(zero).await.is_err());

        let mut ok = draft("v1", Area::Adventureland);
        ok.rating = Some(5);
        assert!(service.add_action(ok).await.is_ok());
    }

    #[tokio::test]
    async fn mismatched_area_is_stored_with_warning() {
        let store = Arc::new(MemoryJournalStore::new());
        store.upsert_visit(&visit("v1", Park::Land)).await.unwrap();
        let service = ActionService::new(store.clone());

        // 海洋乐园的区域挂在陆上乐园的游园里，照常入库
        let action = service
            .add_action(draft("v1", Area::MermaidLagoon))
            .await
            .unwrap();
        assert_eq!(
            store.get_action(&action.id).await.unwrap().unwrap().area,
            Area::MermaidLagoon
        );
    }

    #[tokio::test]
    async fn counters_follow_actions_and_photos() {
        let store = Arc::new(MemoryJournalStore::new());
        store.upsert_visit(&visit("v1", Park::Land)).await.unwrap();
        let service = ActionService::new(store.clone());

        let a1 = service.add_action(draft("v1", Area::Westernland)).await.unwrap();
        let a2 = service.add_action(draft("v1", Area::Westernland)).await.unwrap();
        let v = store.get_visit("v1").await.unwrap().unwrap();
        assert_eq!(v.action_count, Some(2));
        assert_eq!(v.photo_count, Some(0));

        service.add_photo(&a1.id, photo("p1")).await.unwrap();
        service.add_photo(&a1.id, photo("p2")).await.unwrap();
        service.add_photo(&a2.id, photo("p3")).await.unwrap();
        let v = store.get_visit("v1").await.unwrap().unwrap();
        assert_eq!(v.photo_count, Some(3));

        service.remove_photo(&a1.id, "p1").await.unwrap();
        let v = store.get_visit("v1").await.unwrap().unwrap();
        assert_eq!(v.photo_count, Some(2));

        service.delete_action(&a1.id).await.unwrap();
        let v = store.get_visit("v1").await.unwrap().unwrap();
        assert_eq!(v.action_count, Some(1));
        assert_eq!(v.photo_count, Some(1));
    }

    #[tokio::test]
    async fn moving_an_action_recounts_both_visits() {
        let store = Arc::new(MemoryJournalStore::new());
        store.upsert_visit(&visit("v1", Park::Land)).await.unwrap();
        store.upsert_visit(&visit("v2", Park::Land)).await.unwrap();
        let service = ActionService::new(store.clone());

        let mut action = service.add_action(draft("v1", Area::Fantasyland)).await.unwrap();
        action.visit_id = "v2".to_string();
        service.update_action(&action).await.unwrap();

        assert_eq!(
            store.get_visit("v1").await.unwrap().unwrap().action_count,
            Some(0)
        );
        assert_eq!(
            store.get_visit("v2").await.unwrap().unwrap().action_count,
            Some(1)
        );
    }

    #[tokio::test]
    async fn restaurant_details_survive_service_round_trip() {
        let store = Arc::new(MemoryJournalStore::new());
        store.upsert_visit(&visit("v1", Park::Sea)).await.unwrap();
        let service = ActionService::new(store);

        let mut d = draft("v1", Area::MediterraneanHarbor);
        d.location_name = "マゼランズ".to_string();
        d.details = ActionDetails::Restaurant {
            meal_type: Some(MealType::Dinner),
            amount: Some(8200.0),
        };
        let action = service.add_action(d).await.unwrap();

        let fetched = service.get_action(&action.id).await.unwrap().unwrap();
        assert_eq!(
            fetched.details,
            ActionDetails::Restaurant {
                meal_type: Some(MealType::Dinner),
                amount: Some(8200.0),
            }
        );
    }
}
