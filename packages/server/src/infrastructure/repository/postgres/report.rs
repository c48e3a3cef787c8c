//! PostgreSQL Report Store 実装

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::{
    PageRequest, ReportEvent, ReportFilter, ReportId, ReportStore, RepositoryError, UnitId,
    UserId,
};

use super::query_failed;

const SELECT_REPORTS: &str = r#"
SELECT
    r."id",
    r."departmentId" AS unit_id,
    r."title",
    r."description",
    r."location",
    r."status"::text AS status,
    r."priority"::text AS priority,
    r."studentId" AS student_id,
    r."createdAt" AS created_at,
    r."updatedAt" AS updated_at,
    d."name" AS unit_name,
    NULLIF(CONCAT_WS(' ', u."firstName", u."lastName"), '') AS student_name,
    ARRAY(
        SELECT p."url" FROM "ReportPhoto" p WHERE p."reportId" = r."id" ORDER BY p."url"
    ) AS image_urls
FROM "Report" r
LEFT JOIN "Department" d ON d."id" = r."departmentId"
LEFT JOIN "User" u ON u."id" = r."studentId"
"#;

#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    id: String,
    unit_id: String,
    title: String,
    description: String,
    location: String,
    status: String,
    priority: String,
    student_id: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    unit_name: Option<String>,
    student_name: Option<String>,
    image_urls: Vec<String>,
}

impl TryFrom<ReportRow> for ReportEvent {
    type Error = RepositoryError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let corrupt = |e: crate::domain::ValueObjectError| {
            RepositoryError::CorruptRecord(format!("report '{}': {}", row.id, e))
        };
        Ok(Self {
            unit_id: UnitId::new(row.unit_id.clone()).map_err(corrupt)?,
            status: row.status.parse().map_err(corrupt)?,
            priority: row.priority.parse().map_err(corrupt)?,
            student_id: row
                .student_id
                .clone()
                .map(UserId::new)
                .transpose()
                .map_err(corrupt)?,
            id: ReportId::new(row.id.clone()).map_err(corrupt)?,
            title: row.title,
            description: row.description,
            location: row.location,
            created_at: row.created_at.and_utc(),
            updated_at: row.updated_at.and_utc(),
            unit_name: row.unit_name,
            student_name: row.student_name,
            image_urls: row.image_urls,
        })
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ReportFilter) {
    builder.push(" WHERE TRUE");
    if let Some(unit_id) = &filter.unit_id {
        builder
            .push(r#" AND r."departmentId" = "#)
            .push_bind(unit_id.as_str().to_string());
    }
    if let Some(status) = filter.status {
        builder
            .push(r#" AND r."status"::text = "#)
            .push_bind(status.as_str());
    }
    if let Some(priority) = filter.priority {
        builder
            .push(r#" AND r."priority"::text = "#)
            .push_bind(priority.as_str());
    }
    if let Some(range) = filter.created {
        builder
            .push(r#" AND r."createdAt" >= "#)
            .push_bind(range.start.naive_utc())
            .push(r#" AND r."createdAt" < "#)
            .push_bind(range.end.naive_utc());
    }
}

/// PostgreSQL Report Store 実装
pub struct PostgresReportStore {
    pool: PgPool,
}

impl PostgresReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PostgresReportStore {
    async fn count(&self, filter: &ReportFilter) -> Result<u64, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new(r#"SELECT COUNT(*) FROM "Report" r"#);
        push_filter(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(query_failed)?;
        u64::try_from(count).map_err(|e| RepositoryError::CorruptRecord(e.to_string()))
    }

    async fn find_page(
        &self,
        filter: &ReportFilter,
        page: PageRequest,
    ) -> Result<Vec<ReportEvent>, RepositoryError> {
        let offset = i64::try_from(page.offset())
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        let mut builder = QueryBuilder::<Postgres>::new(SELECT_REPORTS);
        push_filter(&mut builder, filter);
        builder
            .push(r#" ORDER BY r."createdAt" DESC, r."id" DESC LIMIT "#)
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(offset);

        let rows: Vec<ReportRow> = builder
            .build_query_as::<ReportRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed)?;
        rows.into_iter().map(ReportEvent::try_from).collect()
    }

    async fn list_unit_ids(&self) -> Result<Vec<UnitId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, String>(r#"SELECT "id" FROM "Department" ORDER BY "id""#)
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed)?;
        ids.into_iter()
            .map(|id| UnitId::new(id).map_err(|e| RepositoryError::CorruptRecord(e.to_string())))
            .collect()
    }
}
