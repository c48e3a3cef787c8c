//! UseCase: オンデマンドのレポート取得
//!
//! `getInitialRecentReports`（今日のレポート）と `getAnnualReports`（今年のレポート）を
//! 処理します。日付の境界はキャンパスのタイムゾーン（固定 UTC オフセット）で計算します。
//! 管理者は全ユニット、それ以外は自分のユニットのレポートのみ取得できます。

use std::sync::Arc;

use chrono::FixedOffset;
use reportcast_shared::time::{Clock, DateRange, day_range, year_range};

use crate::domain::{Identity, PageRequest, ReportFilter, ReportPage, ReportStore};

use super::error::FetchReportsError;

/// レポート取得のユースケース
pub struct FetchReportsUseCase {
    reports: Arc<dyn ReportStore>,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
    page_limit: u32,
}

impl FetchReportsUseCase {
    pub fn new(
        reports: Arc<dyn ReportStore>,
        clock: Arc<dyn Clock>,
        offset: FixedOffset,
        page_limit: u32,
    ) -> Self {
        Self {
            reports,
            clock,
            offset,
            page_limit,
        }
    }

    /// 今日作成されたレポートの 1 ページ目
    pub async fn recent(&self, identity: &Identity) -> Result<ReportPage, FetchReportsError> {
        let range =
            day_range(self.clock.now(), self.offset).ok_or(FetchReportsError::DateRange)?;
        self.fetch(identity, range).await
    }

    /// 今年作成されたレポートの 1 ページ目
    pub async fn annual(&self, identity: &Identity) -> Result<ReportPage, FetchReportsError> {
        let range =
            year_range(self.clock.now(), self.offset).ok_or(FetchReportsError::DateRange)?;
        self.fetch(identity, range).await
    }

    async fn fetch(
        &self,
        identity: &Identity,
        range: DateRange,
    ) -> Result<ReportPage, FetchReportsError> {
        let request = PageRequest::first(self.page_limit);
        let mut filter = ReportFilter::default().created_within(range);

        if !identity.is_admin() {
            match identity.unit_id() {
                Some(unit_id) => filter = filter.with_unit(unit_id.clone()),
                None => return Ok(ReportPage::empty(request)),
            }
        }

        let (count, data) = tokio::try_join!(
            self.reports.count(&filter),
            self.reports.find_page(&filter, request),
        )?;
        Ok(ReportPage::new(request, count, data))
    }
}
