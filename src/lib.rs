pub mod journal;

// 重新导出常用类型和函数，方便外部使用
pub use journal::{
    client::{JournalClient, JournalClientConfig},
    listener::JournalListener,
    migration::{MigrationListener, SnapshotDocument},
    stats::{ActionFilter, ActionStatistics, Dashboard, VisitFilter, VisitStatistics},
    types::{ActionCategory, Area, Park},
};
