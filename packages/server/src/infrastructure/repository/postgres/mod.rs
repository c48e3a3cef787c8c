//! PostgreSQL ストア実装
//!
//! CRUD 層が管理する既存のテーブル（`"Report"`, `"Department"`, `"User"`, `"ReportPhoto"`）を
//! 読み取ります。タイムスタンプ列はタイムゾーン無しの UTC として保存されています。

mod report;
mod user;

pub use report::PostgresReportStore;
pub use user::PostgresUserStore;

use crate::domain::RepositoryError;

fn query_failed(error: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(error.to_string())
}
