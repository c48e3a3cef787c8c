//! UseCase: レポートイベントのファンアウトとメトリクスの再配信
//!
//! CRUD 層はレポートの書き込みが確定した後に `EventBroadcaster` を呼び出します。
//! イベントは `admins` とレポートのユニットのルームへ送られ、その後メトリクスが
//! 全ルームへ再配信されます。配信の失敗は呼び出し側へは返さず、ログにのみ残します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - broadcast_created / broadcast_updated / broadcast_deleted の配信先
//! - refresh_metrics のルームごとのスコープと部分失敗
//!
//! ### どのような状況を想定しているか
//! - 正常系：管理者と infra のワーカーが接続中に infra のレポートが作成される
//! - エッジケース：別ユニットのワーカーには届かない、メンバーのいないルーム
//! - 異常系：一部ユニットの集計失敗

use std::sync::Arc;

use futures_util::future::join_all;

use crate::domain::{
    OutboundMessage, ReportEvent, ReportId, ReportStore, RoomId, RoomRegistry, UnitId,
};

use super::compute_metrics::ComputeMetricsUseCase;

/// Outcome of one metrics refresh cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Rooms a snapshot was pushed to
    pub pushed: Vec<RoomId>,
    /// Units whose snapshot could not be computed
    pub failed_units: Vec<UnitId>,
    pub global_failed: bool,
    pub enumeration_failed: bool,
}

/// イベントブロードキャスター（CRUD 層向けのファサード）
pub struct EventBroadcaster {
    registry: Arc<dyn RoomRegistry>,
    metrics: Arc<ComputeMetricsUseCase>,
    reports: Arc<dyn ReportStore>,
}

impl EventBroadcaster {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        metrics: Arc<ComputeMetricsUseCase>,
        reports: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            registry,
            metrics,
            reports,
        }
    }

    /// `newReport` を配信し、メトリクスを再配信
    pub async fn broadcast_created(&self, report: &ReportEvent) {
        self.emit(&report.unit_id, OutboundMessage::NewReport(report.clone()))
            .await;
        self.refresh_metrics().await;
    }

    /// `reportUpdate` を配信し、メトリクスを再配信
    pub async fn broadcast_updated(&self, report: &ReportEvent) {
        self.emit(&report.unit_id, OutboundMessage::ReportUpdate(report.clone()))
            .await;
        self.refresh_metrics().await;
    }

    /// `reportDeleted` を配信し、メトリクスを再配信
    pub async fn broadcast_deleted(&self, report_id: &ReportId, unit_id: &UnitId) {
        let message = OutboundMessage::ReportDeleted {
            id: report_id.clone(),
            unit_id: unit_id.clone(),
        };
        self.emit(unit_id, message).await;
        self.refresh_metrics().await;
    }

    /// グローバルのスナップショットを `admins` へ、各ユニットのスナップショットを
    /// そのユニットのルームへ配信する
    pub async fn refresh_metrics(&self) -> RefreshSummary {
        let mut summary = RefreshSummary::default();

        match self.metrics.compute_global().await {
            Ok(snapshot) => {
                let admins = RoomId::admins();
                self.registry
                    .broadcast_to_room(&admins, &OutboundMessage::Metrics(snapshot))
                    .await;
                summary.pushed.push(admins);
            }
            Err(e) => {
                tracing::warn!("Global metrics refresh failed: {}", e);
                summary.global_failed = true;
            }
        }

        let unit_ids = match self.reports.list_unit_ids().await {
            Ok(unit_ids) => unit_ids,
            Err(e) => {
                tracing::warn!("Could not enumerate units for metrics refresh: {}", e);
                summary.enumeration_failed = true;
                return summary;
            }
        };

        let results = join_all(unit_ids.into_iter().map(|unit_id| async move {
            match self.metrics.compute_for_unit(&unit_id).await {
                Ok(snapshot) => {
                    let room = RoomId::for_unit(&unit_id);
                    self.registry
                        .broadcast_to_room(&room, &OutboundMessage::Metrics(snapshot))
                        .await;
                    Ok(room)
                }
                Err(e) => {
                    tracing::warn!("Metrics refresh for unit '{}' failed: {}", unit_id, e);
                    Err(unit_id)
                }
            }
        }))
        .await;

        for result in results {
            match result {
                Ok(room) => summary.pushed.push(room),
                Err(unit_id) => summary.failed_units.push(unit_id),
            }
        }

        tracing::debug!(
            "Metrics refreshed for {} room(s), {} unit(s) failed",
            summary.pushed.len(),
            summary.failed_units.len()
        );
        summary
    }

    async fn emit(&self, unit_id: &UnitId, message: OutboundMessage) {
        let event = message.event_name();
        let admins = self
            .registry
            .broadcast_to_room(&RoomId::admins(), &message)
            .await;
        let unit = self
            .registry
            .broadcast_to_room(&RoomId::for_unit(unit_id), &message)
            .await;
        tracing::info!(
            "Broadcast '{}' for unit '{}' to {} admin(s) and {} unit member(s)",
            event,
            unit_id,
            admins,
            unit
        );
    }
}
