//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{AuthError, ConnectionError, MessagePushError, RepositoryError};

/// 接続の認証処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// 認証失敗（接続は Rejected に遷移済み）
    #[error("connection rejected: {0}")]
    Rejected(#[from] AuthError),

    #[error(transparent)]
    InvalidState(#[from] ConnectionError),

    #[error("failed to register connection: {0}")]
    Registry(#[from] MessagePushError),
}

/// メトリクス集計のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("metrics query failed: {0}")]
    QueryFailed(#[from] RepositoryError),
}

/// レポート取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchReportsError {
    #[error("report query failed: {0}")]
    QueryFailed(#[from] RepositoryError),

    /// 現在時刻から日付範囲を組み立てられない
    #[error("date range out of bounds")]
    DateRange,
}
