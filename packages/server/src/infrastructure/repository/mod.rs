//! Repository 実装
//!
//! - `inmemory`: プロセス内のストア（開発・テスト用）
//! - `postgres`: 既存の PostgreSQL スキーマを読むストア（sqlx）

pub mod inmemory;
pub mod postgres;

pub use inmemory::{InMemoryReportStore, InMemoryUserStore};
pub use postgres::{PostgresReportStore, PostgresUserStore};
