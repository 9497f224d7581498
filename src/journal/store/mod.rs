//! 记录存储抽象
//!
//! 业务服务只面向 [`JournalStore`] 接口编程，具体落在 SQLite 还是
//! 内存由调用方注入，测试与统计引擎因此无需真实数据库。

mod memory;
mod sqlite;

pub use memory::MemoryJournalStore;
pub use sqlite::SqliteJournalStore;

use crate::journal::action::models::TimelineAction;
use crate::journal::companion::models::Companion;
use crate::journal::visit::models::Visit;
use anyhow::Result;
use async_trait::async_trait;

/// 三个集合（游园记录、同行伙伴、时间线活动）的统一存取接口
///
/// upsert 以 ID 为准：存在则整条覆盖，不存在则插入。
#[async_trait]
pub trait JournalStore: Send + Sync {
    async fn get_all_visits(&self) -> Result<Vec<Visit>>;
    async fn get_visit(&self, visit_id: &str) -> Result<Option<Visit>>;
    async fn upsert_visit(&self, visit: &Visit) -> Result<()>;
    async fn delete_visit(&self, visit_id: &str) -> Result<()>;
    async fn clear_visits(&self) -> Result<()>;

    async fn get_all_companions(&self) -> Result<Vec<Companion>>;
    async fn get_companion(&self, companion_id: &str) -> Result<Option<Companion>>;
    async fn upsert_companion(&self, companion: &Companion) -> Result<()>;
    async fn delete_companion(&self, companion_id: &str) -> Result<()>;
    async fn clear_companions(&self) -> Result<()>;

    async fn get_all_actions(&self) -> Result<Vec<TimelineAction>>;
    async fn get_action(&self, action_id: &str) -> Result<Option<TimelineAction>>;
    /// 某次游园的全部活动，按发生时间升序（同刻按 ID）
    async fn get_actions_by_visit(&self, visit_id: &str) -> Result<Vec<TimelineAction>>;
    async fn upsert_action(&self, action: &TimelineAction) -> Result<()>;
    async fn delete_action(&self, action_id: &str) -> Result<()>;
    /// 删除某次游园的全部活动，返回删除条数
    async fn delete_actions_by_visit(&self, visit_id: &str) -> Result<u64>;
    async fn clear_actions(&self) -> Result<()>;
}
