//! 迁移服务
//!
//! 把三个集合整体导出为一份带版本号的 JSON 快照，或从快照整体导入。
//! 导入走两阶段：先校验并把全部记录暂存为类型化数据，一条不合法
//! 整单拒绝；校验通过后才清库重写。写入阶段不做回滚。

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::journal::action::models::TimelineAction;
use crate::journal::companion::models::Companion;
use crate::journal::migration::listener::MigrationListener;
use crate::journal::migration::models::{
    ImportReport, ImportState, MigrationError, SnapshotAction, SnapshotDocument,
    SnapshotMetadata, StorePreview, PHOTO_EXCLUSION_NOTE, SNAPSHOT_VERSION,
};
use crate::journal::store::JournalStore;
use crate::journal::visit::models::Visit;

/// 校验通过后的暂存数据
struct StagedSnapshot {
    version: String,
    visits: Vec<Visit>,
    companions: Vec<Companion>,
    actions: Vec<SnapshotAction>,
}

/// 迁移服务
pub struct MigrationService {
    store: Arc<dyn JournalStore>,
    listener: Arc<dyn MigrationListener>,
    state: RwLock<ImportState>,
}

impl MigrationService {
    /// 创建迁移服务
    pub fn new(store: Arc<dyn JournalStore>, listener: Arc<dyn MigrationListener>) -> Self {
        Self {
            store,
            listener,
            state: RwLock::new(ImportState::Idle),
        }
    }

    /// 当前导入状态
    pub async fn import_state(&self) -> ImportState {
        *self.state.read().await
    }

    async fn set_state(&self, state: ImportState) {
        *self.state.write().await = state;
        debug!("[Migration] 导入状态迁转 -> {}", state);
        self.listener.on_import_state_changed(state).await;
    }

    /// 导出全量快照
    ///
    /// 照片不进快照：活动侧替换成 photoCount，游园侧剔除缓存的
    /// photo_count。落盘与分享交给调用方。
    pub async fn export_snapshot(&self) -> Result<SnapshotDocument> {
        info!("[Migration] 🔄 开始导出快照...");

        // 1. 读取三个集合
        let visits = self.store.get_all_visits().await?;
        let companions = self.store.get_all_companions().await?;
        let actions = self.store.get_all_actions().await?;

        // 2. 剥离照片
        let exported_photos: u64 = actions.iter().map(|a| a.photos.len() as u64).sum();
        let snapshot_visits: Vec<Visit> = visits
            .into_iter()
            .map(|mut v| {
                v.photo_count = None;
                v
            })
            .collect();
        let snapshot_actions: Vec<SnapshotAction> =
            actions.iter().map(SnapshotAction::from_action).collect();

        // 3. 组装文档
        let metadata = SnapshotMetadata {
            total_visits: snapshot_visits.len() as u64,
            total_actions: snapshot_actions.len() as u64,
            total_companions: companions.len() as u64,
            exported_photos,
            note: PHOTO_EXCLUSION_NOTE.to_string(),
        };
        let document = SnapshotDocument {
            version: SNAPSHOT_VERSION.to_string(),
            export_date: Utc::now(),
            visits: snapshot_visits,
            companions,
            actions: snapshot_actions,
            metadata,
        };

        info!(
            "[Migration] ✅ 快照导出完成：{} 次游园 / {} 位伙伴 / {} 条活动，剔除照片 {} 张",
            document.metadata.total_visits,
            document.metadata.total_companions,
            document.metadata.total_actions,
            document.metadata.exported_photos
        );
        let metadata_json =
            serde_json::to_string(&document.metadata).context("序列化快照汇总信息失败")?;
        self.listener.on_export_finish(metadata_json).await;
        Ok(document)
    }

    /// 从快照文档整体导入（清库重写）
    pub async fn import_snapshot(&self, document: Value) -> Result<ImportReport, MigrationError> {
        info!("[Migration] 🔄 开始导入快照...");

        // 1. 校验并暂存
        self.set_state(ImportState::Validating).await;
        self.listener.on_import_progress(10).await;

        let staged = match Self::validate_and_stage(&document) {
            Ok(staged) => staged,
            Err(errors) => {
                warn!(
                    "[Migration] ❌ 快照校验未通过，共 {} 处问题：{:?}",
                    errors.len(),
                    errors
                );
                self.set_state(ImportState::Rejected).await;
                let payload = serde_json::to_string(&errors).unwrap_or_default();
                self.listener.on_import_failed(payload).await;
                return Err(MigrationError::Validation(errors));
            }
        };

        if let Some(major) = staged.version.split('.').next() {
            if major != "1" {
                warn!(
                    "[Migration] ⚠️ 快照版本 {} 与当前支持的 {} 主版本不同，按最大努力导入",
                    staged.version, SNAPSHOT_VERSION
                );
            }
        }

        // 2. 清空本地三个集合
        self.set_state(ImportState::Clearing).await;
        self.listener.on_import_progress(50).await;
        if let Err(e) = self.clear_all_collections().await {
            self.listener.on_import_failed(format!("\"{}\"", e)).await;
            return Err(MigrationError::Storage(e));
        }

        // 3. 按依赖顺序写入：伙伴 → 游园 → 活动
        self.set_state(ImportState::Inserting).await;
        self.listener.on_import_progress(80).await;

        let dropped_photos: u64 = staged.actions.iter().map(|a| a.photo_count).sum();
        let report = ImportReport {
            imported_visits: staged.visits.len() as u64,
            imported_companions: staged.companions.len() as u64,
            imported_actions: staged.actions.len() as u64,
            dropped_photos,
            source_version: staged.version.clone(),
        };

        if let Err((inserted, e)) = self.insert_staged(staged).await {
            warn!(
                "[Migration] ❌ 写入阶段失败（已写入 {} 条）：{}",
                inserted, e
            );
            self.listener.on_import_failed(format!("\"{}\"", e)).await;
            return Err(MigrationError::PartialImport {
                inserted,
                source: e,
            });
        }

        // 4. 完成
        self.set_state(ImportState::Completed).await;
        self.listener.on_import_progress(100).await;
        info!(
            "[Migration] ✅ 快照导入完成：{} 次游园 / {} 位伙伴 / {} 条活动，丢弃照片 {} 张",
            report.imported_visits,
            report.imported_companions,
            report.imported_actions,
            report.dropped_photos
        );
        let report_json = serde_json::to_string(&report)
            .map_err(|e| MigrationError::Storage(e.into()))?;
        self.listener.on_import_finish(report_json).await;
        Ok(report)
    }

    /// 导入前的本地存量预览（只读）
    pub async fn get_preview_counts(&self) -> Result<StorePreview> {
        let visits = self.store.get_all_visits().await?;
        let companions = self.store.get_all_companions().await?;
        let actions = self.store.get_all_actions().await?;
        Ok(StorePreview {
            total_visits: visits.len() as u64,
            total_companions: companions.len() as u64,
            total_actions: actions.len() as u64,
            total_photos: actions.iter().map(|a| a.photos.len() as u64).sum(),
        })
    }

    async fn clear_all_collections(&self) -> Result<()> {
        self.store.clear_companions().await?;
        self.store.clear_visits().await?;
        self.store.clear_actions().await?;
        Ok(())
    }

    async fn insert_staged(&self, staged: StagedSnapshot) -> Result<(), (u64, anyhow::Error)> {
        let mut inserted: u64 = 0;
        for companion in &staged.companions {
            if let Err(e) = self.store.upsert_companion(companion).await {
                return Err((inserted, e));
            }
            inserted += 1;
        }
        for visit in &staged.visits {
            if let Err(e) = self.store.upsert_visit(visit).await {
                return Err((inserted, e));
            }
            inserted += 1;
        }
        for action in staged.actions {
            let action: TimelineAction = action.into_action();
            if let Err(e) = self.store.upsert_action(&action).await {
                return Err((inserted, e));
            }
            inserted += 1;
        }
        Ok(())
    }

    /// 结构校验 + 逐条反序列化暂存；所有问题一次性收集
    fn validate_and_stage(document: &Value) -> Result<StagedSnapshot, Vec<String>> {
        let Some(obj) = document.as_object() else {
            return Err(vec!["快照根节点必须是 JSON 对象".to_string()]);
        };

        let mut errors: Vec<String> = Vec::new();

        let version = match obj.get("version") {
            Some(Value::String(v)) => v.clone(),
            Some(_) => {
                errors.push("version 字段必须是字符串".to_string());
                String::new()
            }
            None => {
                errors.push("version 字段缺失".to_string());
                String::new()
            }
        };

        if obj.get("metadata").is_none() {
            errors.push("metadata 字段缺失".to_string());
        }

        let visits =
            Self::stage_collection::<Visit>(obj, "visits", &mut errors).unwrap_or_default();
        let companions = Self::stage_collection::<Companion>(obj, "companions", &mut errors)
            .unwrap_or_default();
        let actions = Self::stage_collection::<SnapshotAction>(obj, "actions", &mut errors)
            .unwrap_or_default();

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(StagedSnapshot {
            version,
            visits,
            companions,
            actions,
        })
    }

    fn stage_collection<T: serde::de::DeserializeOwned>(
        obj: &serde_json::Map<String, Value>,
        field: &str,
        errors: &mut Vec<String>,
    ) -> Option<Vec<T>> {
        match obj.get(field) {
            Some(Value::Array(items)) => {
                let mut staged = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match serde_json::from_value::<T>(item.clone()) {
                        Ok(record) => staged.push(record),
                        Err(e) => errors.push(format!("{}[{}] 无法解析: {}", field, index, e)),
                    }
                }
                Some(staged)
            }
            Some(_) => {
                errors.push(format!("{} 字段必须是数组", field));
                None
            }
            None => {
                errors.push(format!("{} 字段缺失", field));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::action::models::{ActionDetails, Photo};
    use crate::journal::migration::listener::EmptyMigrationListener;
    use crate::journal::store::MemoryJournalStore;
    use crate::journal::types::{Area, Park};
    use std::sync::Mutex;

    fn visit(id: &str, date: &str, park: Park) -> Visit {
        Visit {
            id: id.to_string(),
            date: date.parse().unwrap(),
            park,
            companion_ids: vec!["c1".to_string()],
            pass_type: None,
            weather: None,
            start_time: None,
            end_time: None,
            notes: None,
            action_count: Some(1),
            photo_count: Some(2),
        }
    }

    fn companion(id: &str, name: &str) -> Companion {
        Companion {
            id: id.to_string(),
            name: name.to_string(),
            created_at: 1_700_000_000_000,
        }
    }

    fn action_with_photos(id: &str, visit_id: &str, photos: usize) -> TimelineAction {
        TimelineAction {
            id: id.to_string(),
            visit_id: visit_id.to_string(),
            area: Area::Fantasyland,
            location_name: "美女と野獣".to_string(),
            time: "2024-01-15T10:00:00".parse().unwrap(),
            duration_minutes: Some(8),
            wait_minutes: Some(100),
            rating: Some(5),
            notes: None,
            photos: (0..photos)
                .map(|i| Photo {
                    id: format!("p{}", i),
                    uri: format!("ph://p{}", i),
                    thumbnail_uri: None,
                    width: None,
                    height: None,
                    taken_at: None,
                    caption: None,
                })
                .collect(),
            details: ActionDetails::Attraction {
                used_priority_pass: true,
            },
        }
    }

    async fn seeded_store() -> Arc<MemoryJournalStore> {
        let store = Arc::new(MemoryJournalStore::new());
        store.upsert_companion(&companion("c1", "小美")).await.unwrap();
        store
            .upsert_visit(&visit("v1", "2024-01-15", Park::Land))
            .await
            .unwrap();
        store
            .upsert_action(&action_with_photos("a1", "v1", 2))
            .await
            .unwrap();
        store
            .upsert_action(&action_with_photos("a2", "v1", 1))
            .await
            .unwrap();
        store
    }

    fn service(store: Arc<MemoryJournalStore>) -> MigrationService {
        MigrationService::new(store, Arc::new(EmptyMigrationListener))
    }

    #[tokio::test]
    async fn export_strips_photos_but_keeps_counts() {
        let svc = service(seeded_store().await);
        let doc = svc.export_snapshot().await.unwrap();

        assert_eq!(doc.version, SNAPSHOT_VERSION);
        assert_eq!(doc.metadata.total_visits, 1);
        assert_eq!(doc.metadata.total_actions, 2);
        assert_eq!(doc.metadata.exported_photos, 3);
        assert_eq!(doc.actions[0].photo_count, 2);
        // 游园侧缓存的照片数是派生值，导出时剔除
        assert_eq!(doc.visits[0].photo_count, None);
        assert_eq!(doc.visits[0].action_count, Some(1));

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["actions"][0].get("photos").is_none());
        assert_eq!(json["actions"][0]["photoCount"], 2);
        assert!(json["visits"][0].get("photoCount").is_none());
    }

    #[tokio::test]
    async fn round_trip_restores_counts_without_photos() {
        let svc = service(seeded_store().await);
        let doc = svc.export_snapshot().await.unwrap();
        let doc_json = serde_json::to_value(&doc).unwrap();

        let target = Arc::new(MemoryJournalStore::new());
        let import_svc = service(target.clone());
        let report = import_svc.import_snapshot(doc_json).await.unwrap();

        assert_eq!(report.imported_visits, 1);
        assert_eq!(report.imported_companions, 1);
        assert_eq!(report.imported_actions, 2);
        assert_eq!(report.dropped_photos, 3);
        assert_eq!(report.source_version, SNAPSHOT_VERSION);

        let actions = target.get_all_actions().await.unwrap();
        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(|a| a.photos.is_empty()));
        let visits = target.get_all_visits().await.unwrap();
        assert_eq!(visits[0].companion_ids, vec!["c1".to_string()]);
        assert_eq!(import_svc.import_state().await, ImportState::Completed);
    }

    #[tokio::test]
    async fn import_replaces_existing_records() {
        let svc = service(seeded_store().await);
        let doc = serde_json::to_value(svc.export_snapshot().await.unwrap()).unwrap();

        // 目标库先塞进将被覆盖的旧数据
        let target = Arc::new(MemoryJournalStore::new());
        target
            .upsert_visit(&visit("old", "2020-05-05", Park::Sea))
            .await
            .unwrap();
        target
            .upsert_companion(&companion("old-c", "旧伙伴"))
            .await
            .unwrap();

        let import_svc = service(target.clone());
        import_svc.import_snapshot(doc).await.unwrap();

        let visits = target.get_all_visits().await.unwrap();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].id, "v1");
        let companions = target.get_all_companions().await.unwrap();
        assert_eq!(companions.len(), 1);
        assert_eq!(companions[0].id, "c1");
    }

    #[tokio::test]
    async fn missing_actions_field_rejects_whole_document() {
        let store = Arc::new(MemoryJournalStore::new());
        store
            .upsert_visit(&visit("keep", "2024-06-01", Park::Sea))
            .await
            .unwrap();
        let svc = service(store.clone());

        let doc = serde_json::json!({
            "version": "1.0.0",
            "exportDate": "2024-06-01T00:00:00Z",
            "visits": [],
            "companions": [],
            "metadata": {}
        });
        let err = svc.import_snapshot(doc).await.unwrap_err();

        let messages = err.validation_messages();
        assert!(messages.iter().any(|m| m.contains("actions")), "{:?}", messages);
        assert_eq!(svc.import_state().await, ImportState::Rejected);
        // 校验失败不得触碰存储
        assert_eq!(store.get_all_visits().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn validation_collects_every_problem() {
        let svc = service(Arc::new(MemoryJournalStore::new()));
        let doc = serde_json::json!({
            "version": 2,
            "visits": "not-an-array",
            "companions": [],
            "actions": [{ "id": "a1" }]
        });
        let err = svc.import_snapshot(doc).await.unwrap_err();
        let messages = err.validation_messages();

        assert!(messages.iter().any(|m| m.contains("version")));
        assert!(messages.iter().any(|m| m.contains("visits")));
        assert!(messages.iter().any(|m| m.contains("actions[0]")));
        assert!(messages.iter().any(|m| m.contains("metadata")));
    }

    #[tokio::test]
    async fn non_object_document_is_rejected() {
        let svc = service(Arc::new(MemoryJournalStore::new()));
        let err = svc.import_snapshot(serde_json::json!([1, 2, 3])).await.unwrap_err();
        assert!(matches!(err, MigrationError::Validation(_)));
    }

    /// 指定操作必然失败的存储，用于覆盖写入阶段的失败分支
    struct FaultyStore {
        inner: MemoryJournalStore,
        fail_clear_visits: bool,
        fail_upsert_visit: bool,
    }

    impl FaultyStore {
        fn failing_visit_upserts() -> Self {
            Self {
                inner: MemoryJournalStore::new(),
                fail_clear_visits: false,
                fail_upsert_visit: true,
            }
        }

        fn failing_clears() -> Self {
            Self {
                inner: MemoryJournalStore::new(),
                fail_clear_visits: true,
                fail_upsert_visit: false,
            }
        }
    }

    #[async_trait::async_trait]
    impl JournalStore for FaultyStore {
        async fn get_all_visits(&self) -> Result<Vec<Visit>> {
            self.inner.get_all_visits().await
        }
        async fn get_visit(&self, visit_id: &str) -> Result<Option<Visit>> {
            self.inner.get_visit(visit_id).await
        }
        async fn upsert_visit(&self, visit: &Visit) -> Result<()> {
            if self.fail_upsert_visit {
                return Err(anyhow::anyhow!("磁盘已满"));
            }
            self.inner.upsert_visit(visit).await
        }
        async fn delete_visit(&self, visit_id: &str) -> Result<()> {
            self.inner.delete_visit(visit_id).await
        }
        async fn clear_visits(&self) -> Result<()> {
            if self.fail_clear_visits {
                return Err(anyhow::anyhow!("磁盘已满"));
            }
            self.inner.clear_visits().await
        }
        async fn get_all_companions(&self) -> Result<Vec<Companion>> {
            self.inner.get_all_companions().await
        }
        async fn get_companion(&self, companion_id: &str) -> Result<Option<Companion>> {
            self.inner.get_companion(companion_id).await
        }
        async fn upsert_companion(&self, companion: &Companion) -> Result<()> {
            self.inner.upsert_companion(companion).await
        }
        async fn delete_companion(&self, companion_id: &str) -> Result<()> {
            self.inner.delete_companion(companion_id).await
        }
        async fn clear_companions(&self) -> Result<()> {
            self.inner.clear_companions().await
        }
        async fn get_all_actions(&self) -> Result<Vec<TimelineAction>> {
            self.inner.get_all_actions().await
        }
        async fn get_action(&self, action_id: &str) -> Result<Option<TimelineAction>> {
            self.inner.get_action(action_id).await
        }
        async fn get_actions_by_visit(&self, visit_id: &str) -> Result<Vec<TimelineAction>> {
            self.inner.get_actions_by_visit(visit_id).await
        }
        async fn upsert_action(&self, action: &TimelineAction) -> Result<()> {
            self.inner.upsert_action(action).await
        }
        async fn delete_action(&self, action_id: &str) -> Result<()> {
            self.inner.delete_action(action_id).await
        }
        async fn delete_actions_by_visit(&self, visit_id: &str) -> Result<u64> {
            self.inner.delete_actions_by_visit(visit_id).await
        }
        async fn clear_actions(&self) -> Result<()> {
            self.inner.clear_actions().await
        }
    }

    #[tokio::test]
    async fn mid_insert_failure_leaves_store_partially_written() {
        let source = service(seeded_store().await);
        let doc = serde_json::to_value(source.export_snapshot().await.unwrap()).unwrap();

        // 伙伴写入成功后，第一条游园记录写入失败
        let target = Arc::new(FaultyStore::failing_visit_upserts());
        let svc = MigrationService::new(target.clone(), Arc::new(EmptyMigrationListener));
        let err = svc.import_snapshot(doc).await.unwrap_err();

        match err {
            MigrationError::PartialImport { inserted, .. } => assert_eq!(inserted, 1),
            other => panic!("期望 PartialImport，实际是 {:?}", other),
        }
        // 不回滚：伙伴已落库，游园与活动没有
        assert_eq!(target.get_all_companions().await.unwrap().len(), 1);
        assert!(target.get_all_visits().await.unwrap().is_empty());
        assert!(target.get_all_actions().await.unwrap().is_empty());
        // 状态机停在出错的阶段
        assert_eq!(svc.import_state().await, ImportState::Inserting);
    }

    #[tokio::test]
    async fn clear_failure_surfaces_as_storage_error() {
        let source = service(seeded_store().await);
        let doc = serde_json::to_value(source.export_snapshot().await.unwrap()).unwrap();

        let target = Arc::new(FaultyStore::failing_clears());
        let svc = MigrationService::new(target, Arc::new(EmptyMigrationListener));
        let err = svc.import_snapshot(doc).await.unwrap_err();

        assert!(matches!(err, MigrationError::Storage(_)));
        assert_eq!(svc.import_state().await, ImportState::Clearing);
    }

    struct RecordingListener {
        states: Mutex<Vec<ImportState>>,
        progress: Mutex<Vec<i32>>,
    }

    #[async_trait::async_trait]
    impl MigrationListener for RecordingListener {
        async fn on_import_state_changed(&self, state: ImportState) {
            self.states.lock().unwrap().push(state);
        }
        async fn on_import_progress(&self, progress: i32) {
            self.progress.lock().unwrap().push(progress);
        }
        async fn on_import_finish(&self, _report: String) {}
        async fn on_import_failed(&self, _errors: String) {}
        async fn on_export_finish(&self, _metadata: String) {}
    }

    #[tokio::test]
    async fn listener_sees_state_machine_in_order() {
        let listener = Arc::new(RecordingListener {
            states: Mutex::new(Vec::new()),
            progress: Mutex::new(Vec::new()),
        });
        let source = service(seeded_store().await);
        let doc = serde_json::to_value(source.export_snapshot().await.unwrap()).unwrap();

        let svc = MigrationService::new(Arc::new(MemoryJournalStore::new()), listener.clone());
        svc.import_snapshot(doc).await.unwrap();

        assert_eq!(
            *listener.states.lock().unwrap(),
            vec![
                ImportState::Validating,
                ImportState::Clearing,
                ImportState::Inserting,
                ImportState::Completed
            ]
        );
        assert_eq!(*listener.progress.lock().unwrap(), vec![10, 50, 80, 100]);
    }

    #[tokio::test]
    async fn rejected_import_stops_at_validating() {
        let listener = Arc::new(RecordingListener {
            states: Mutex::new(Vec::new()),
            progress: Mutex::new(Vec::new()),
        });
        let svc = MigrationService::new(Arc::new(MemoryJournalStore::new()), listener.clone());
        let _ = svc.import_snapshot(serde_json::json!({})).await;

        assert_eq!(
            *listener.states.lock().unwrap(),
            vec![ImportState::Validating, ImportState::Rejected]
        );
        assert_eq!(*listener.progress.lock().unwrap(), vec![10]);
    }

    #[tokio::test]
    async fn preview_counts_reflect_store_contents() {
        let svc = service(seeded_store().await);
        let preview = svc.get_preview_counts().await.unwrap();
        assert_eq!(
            preview,
            StorePreview {
                total_visits: 1,
                total_companions: 1,
                total_actions: 2,
                total_photos: 3,
            }
        );
    }
}
