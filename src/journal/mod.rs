pub mod action;
pub mod client;
pub mod companion;
pub mod db;
pub mod listener;
pub mod migration;
pub mod stats;
pub mod store;
pub mod types;
pub mod visit;

// 重新导出客户端与监听器
pub use client::{JournalClient, JournalClientConfig};
pub use listener::{EmptyJournalListener, JournalListener};
