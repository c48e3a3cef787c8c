//! InMemory Report Store 実装
//!
//! ドメイン層が定義する ReportStore trait の具体的な実装。
//! レポートと組織ユニットを BTreeMap / BTreeSet に保持します。
//! 書き込み（insert / remove）は CRUD 層から直接呼ばれ、ReportStore としては読み取り専用です。

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    PageRequest, ReportEvent, ReportFilter, ReportId, ReportStore, RepositoryError, UnitId,
};

#[derive(Default)]
struct ReportTable {
    reports: BTreeMap<ReportId, ReportEvent>,
    units: BTreeSet<UnitId>,
}

/// インメモリ Report Store 実装
#[derive(Default)]
pub struct InMemoryReportStore {
    table: Mutex<ReportTable>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 組織ユニットを登録（レポートが無くてもメトリクスの対象になる）
    pub async fn add_unit(&self, unit_id: UnitId) {
        self.table.lock().await.units.insert(unit_id);
    }

    /// レポートを追加または置き換え、以前のスナップショットを返す
    pub async fn insert(&self, report: ReportEvent) -> Option<ReportEvent> {
        let mut table = self.table.lock().await;
        table.units.insert(report.unit_id.clone());
        table.reports.insert(report.id.clone(), report)
    }

    /// レポートを削除
    pub async fn remove(&self, report_id: &ReportId) -> Option<ReportEvent> {
        self.table.lock().await.reports.remove(report_id)
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn count(&self, filter: &ReportFilter) -> Result<u64, RepositoryError> {
        let table = self.table.lock().await;
        let count = table
            .reports
            .values()
            .filter(|report| filter.matches(report))
            .count();
        Ok(count as u64)
    }

    async fn find_page(
        &self,
        filter: &ReportFilter,
        page: PageRequest,
    ) -> Result<Vec<ReportEvent>, RepositoryError> {
        let table = self.table.lock().await;
        let mut matching: Vec<&ReportEvent> = table
            .reports
            .values()
            .filter(|report| filter.matches(report))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn list_unit_ids(&self) -> Result<Vec<UnitId>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table.units.iter().cloned().collect())
    }
}

/// Report fixture for unit tests
#[cfg(test)]
pub fn test_report(
    id: &str,
    unit: &str,
    status: crate::domain::ReportStatus,
    priority: crate::domain::ReportPriority,
) -> ReportEvent {
    use chrono::{TimeZone, Utc};

    let created_at = Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap();
    ReportEvent {
        id: ReportId::new(id.to_string()).unwrap(),
        unit_id: UnitId::new(unit.to_string()).unwrap(),
        title: format!("Report {id}"),
        description: "Something needs fixing".to_string(),
        location: "Main building".to_string(),
        status,
        priority,
        student_id: None,
        created_at,
        updated_at: created_at,
        unit_name: None,
        student_name: None,
        image_urls: Vec::new(),
    }
}
