//! 记录本监听器回调接口

use async_trait::async_trait;

/// 记录本监听器回调接口
///
/// 列表类回调的负载是序列化后的 JSON 字符串，便于直接穿过移动端桥接层。
#[async_trait]
pub trait JournalListener: Send + Sync {
    /// 游园记录列表变更（新增、更新或删除后推送全量列表）
    async fn on_visit_list_changed(&self, visit_list: String);

    /// 同行伙伴列表变更
    async fn on_companion_list_changed(&self, companion_list: String);

    /// 某次游园的时间线变更
    async fn on_timeline_changed(&self, visit_id: String, timeline: String);

    /// 游园总次数变更
    async fn on_total_visit_count_changed(&self, total_count: i64);
}

/// 空实现（默认监听器）
pub struct EmptyJournalListener;

#[async_trait]
impl JournalListener for EmptyJournalListener {
    async fn on_visit_list_changed(&self, _visit_list: String) {}
    async fn on_companion_list_changed(&self, _companion_list: String) {}
    async fn on_timeline_changed(&self, _visit_id: String, _timeline: String) {}
    async fn on_total_visit_count_changed(&self, _total_count: i64) {}
}
