//! UseCase: メトリクスのスナップショット集計
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - compute_global / compute_for_unit
//! - ステータス別・優先度別のカウントクエリの並行実行と集約
//!
//! ### なぜこのテストが必要か
//! - `total == pending + in_progress + completed` が常に成り立つことを保証する
//! - 同一データに対する集計が冪等であることを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：ユニット "infra" の 6 件（pending 3 / in_progress 2 / completed 1）
//! - エッジケース：レポート 0 件、存在しないユニット
//! - 異常系：ストア障害

use std::sync::Arc;

use crate::domain::{
    MetricsScope, MetricsSnapshot, ReportFilter, ReportPriority, ReportStatus, ReportStore,
    UnitId,
};

use super::error::MetricsError;

/// メトリクス集計のユースケース（スナップショットはキャッシュしない）
pub struct ComputeMetricsUseCase {
    reports: Arc<dyn ReportStore>,
}

impl ComputeMetricsUseCase {
    pub fn new(reports: Arc<dyn ReportStore>) -> Self {
        Self { reports }
    }

    /// 全レポートのスナップショット
    pub async fn compute_global(&self) -> Result<MetricsSnapshot, MetricsError> {
        self.compute(MetricsScope::Global).await
    }

    /// ユニットのスナップショット（存在しないユニットは全て 0）
    pub async fn compute_for_unit(&self, unit_id: &UnitId) -> Result<MetricsSnapshot, MetricsError> {
        self.compute(MetricsScope::Unit(unit_id.clone())).await
    }

    async fn compute(&self, scope: MetricsScope) -> Result<MetricsSnapshot, MetricsError> {
        let base = ReportFilter::for_scope(&scope);
        let [pending, in_progress, completed] =
            ReportStatus::ALL.map(|status| base.clone().with_status(status));
        let [low, medium, high] =
            ReportPriority::ALL.map(|priority| base.clone().with_priority(priority));

        let (pending, in_progress, completed, low, medium, high) = tokio::try_join!(
            self.reports.count(&pending),
            self.reports.count(&in_progress),
            self.reports.count(&completed),
            self.reports.count(&low),
            self.reports.count(&medium),
            self.reports.count(&high),
        )?;

        Ok(MetricsSnapshot::from_counts(
            scope,
            [pending, in_progress, completed],
            [low, medium, high],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RepositoryError, repository::MockReportStore},
        infrastructure::repository::inmemory::{InMemoryReportStore, test_report},
    };

    fn unit(id: &str) -> UnitId {
        UnitId::new(id.to_string()).unwrap()
    }

    async fn infra_store() -> Arc<InMemoryReportStore> {
        let store = Arc::new(InMemoryReportStore::new());
        let infra = [
            ("r1", ReportStatus::Pending, ReportPriority::High),
            ("r2", ReportStatus::Pending, ReportPriority::Low),
            ("r3", ReportStatus::Pending, ReportPriority::Medium),
            ("r4", ReportStatus::InProgress, ReportPriority::High),
            ("r5", ReportStatus::InProgress, ReportPriority::Medium),
            ("r6", ReportStatus::Completed, ReportPriority::Low),
        ];
        for (id, status, priority) in infra {
            store.insert(test_report(id, "infra", status, priority)).await;
        }
        store
            .insert(test_report("r7", "sanitation", ReportStatus::InProgress, ReportPriority::Medium))
            .await;
        store
    }

    #[tokio::test]
    async fn test_compute_for_unit_counts_buckets() {
        // テスト項目: ユニット "infra" のスナップショットが正しく集計される
        // given (前提条件):
        let usecase = ComputeMetricsUseCase::new(infra_store().await);

        // when (操作):
        let snapshot = usecase.compute_for_unit(&unit("infra")).await.unwrap();

        // then (期待する結果):
        assert_eq!(snapshot.scope, MetricsScope::Unit(unit("infra")));
        assert_eq!(snapshot.total, 6);
        assert_eq!(
            (snapshot.pending, snapshot.in_progress, snapshot.completed),
            (3, 2, 1)
        );
        assert_eq!((snapshot.low, snapshot.medium, snapshot.high), (2, 2, 2));
    }

    #[tokio::test]
    async fn test_compute_global_total_equals_status_sum() {
        // テスト項目: グローバルの total はステータス別カウントの合計と一致する
        // given (前提条件):
        let usecase = ComputeMetricsUseCase::new(infra_store().await);

        // when (操作):
        let snapshot = usecase.compute_global().await.unwrap();

        // then (期待する結果):
        assert_eq!(snapshot.total, 7);
        assert_eq!(
            snapshot.total,
            snapshot.pending + snapshot.in_progress + snapshot.completed
        );
    }

    #[tokio::test]
    async fn test_compute_global_with_no_reports() {
        // テスト項目: レポート 0 件でも集計できる
        // given (前提条件):
        let usecase = ComputeMetricsUseCase::new(Arc::new(InMemoryReportStore::new()));

        // when (操作):
        let snapshot = usecase.compute_global().await.unwrap();

        // then (期待する結果):
        assert_eq!(snapshot, MetricsSnapshot::empty(MetricsScope::Global));
    }

    #[tokio::test]
    async fn test_compute_for_unit_is_idempotent() {
        // テスト項目: データが変わらなければ同じスナップショットが得られる
        // given (前提条件):
        let usecase = ComputeMetricsUseCase::new(infra_store().await);

        // when (操作):
        let first = usecase.compute_for_unit(&unit("infra")).await.unwrap();
        let second = usecase.compute_for_unit(&unit("infra")).await.unwrap();

        // then (期待する結果):
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_compute_for_unknown_unit_is_all_zero() {
        // テスト項目: 存在しないユニットは全て 0 のスナップショットになる
        // given (前提条件):
        let usecase = ComputeMetricsUseCase::new(infra_store().await);

        // when (操作):
        let snapshot = usecase.compute_for_unit(&unit("nowhere")).await.unwrap();

        // then (期待する結果):
        assert_eq!(snapshot, MetricsSnapshot::empty(MetricsScope::Unit(unit("nowhere"))));
    }

    #[tokio::test]
    async fn test_compute_store_failure() {
        // テスト項目: ストア障害は QueryFailed になる
        // given (前提条件):
        let mut store = MockReportStore::new();
        store
            .expect_count()
            .returning(|_| Err(RepositoryError::QueryFailed("timeout".to_string())));
        let usecase = ComputeMetricsUseCase::new(Arc::new(store));

        // when (操作):
        let result = usecase.compute_global().await;

        // then (期待する結果):
        assert!(matches!(result, Err(MetricsError::QueryFailed(_))));
    }
}
