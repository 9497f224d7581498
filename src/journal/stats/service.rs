//! 统计服务
//!
//! 从注入的存储装载集合，委托纯引擎计算。引擎本身无 I/O，
//! 这里只负责取数、组合与仪表盘的整体超时保护。

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};

use crate::journal::stats::engine;
use crate::journal::stats::models::{
    ActionFilter, ActionStatistics, Dashboard, VisitFilter, VisitStatistics,
};
use crate::journal::store::JournalStore;

/// 仪表盘整体超时的默认值（毫秒）
pub const DEFAULT_STATS_TIMEOUT_MS: u64 = 5_000;

/// 统计服务
pub struct StatsService {
    store: Arc<dyn JournalStore>,
    timeout: Duration,
}

impl StatsService {
    /// 创建统计服务；`timeout_ms` 控制仪表盘的整体超时
    pub fn new(store: Arc<dyn JournalStore>, timeout_ms: u64) -> Self {
        Self {
            store,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// 游园维度统计
    pub async fn visit_statistics(&self, filter: &VisitFilter) -> Result<VisitStatistics> {
        let visits = self.store.get_all_visits().await?;
        let companions = self.store.get_all_companions().await?;
        let stats = engine::compute_visit_statistics(&visits, &companions, filter);
        debug!(
            "[Stats] 游园统计完成：筛中 {} 条 / 全量 {} 条",
            stats.total_visits,
            visits.len()
        );
        Ok(stats)
    }

    /// 活动维度统计
    pub async fn action_statistics(&self, filter: &ActionFilter) -> Result<ActionStatistics> {
        let actions = self.store.get_all_actions().await?;
        let stats = engine::compute_action_statistics(&actions, filter);
        debug!(
            "[Stats] 活动统计完成：筛中 {} 条 / 全量 {} 条",
            stats.total_actions,
            actions.len()
        );
        Ok(stats)
    }

    /// 仪表盘：两个维度不加筛选一次取齐
    ///
    /// 装载 + 计算整体跑在一个 `tokio::time::timeout` 里，超时按普通
    /// 失败返回，不重试。
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let work = async {
            let visits = self.visit_statistics(&VisitFilter::default()).await?;
            let actions = self.action_statistics(&ActionFilter::default()).await?;
            Ok::<Dashboard, anyhow::Error>(Dashboard { visits, actions })
        };

        match tokio::time::timeout(self.timeout, work).await {
            Ok(result) => {
                let dashboard = result?;
                info!(
                    "[Stats] 📊 仪表盘统计完成：{} 次游园 / {} 条活动",
                    dashboard.visits.total_visits, dashboard.actions.total_actions
                );
                Ok(dashboard)
            }
            Err(_) => {
                warn!("[Stats] ⚠️ 仪表盘统计超时（{} 毫秒）", self.timeout.as_millis());
                Err(anyhow!("统计超时（{} 毫秒）", self.timeout.as_millis()))
            }
        }
    }
}
