//! エンティティとスナップショット

use chrono::{DateTime, Utc};
use reportcast_shared::time::DateRange;

use super::value_object::{ReportId, ReportPriority, ReportStatus, Role, UnitId, UserId};

/// User record as returned by the user/organization store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub role: Role,
    /// Unit whose supervisor this user is, if any
    pub supervised_unit: Option<UnitId>,
    /// Unit this user works in, if any
    pub assigned_unit: Option<UnitId>,
}

/// Resolved user context attached to an authenticated connection.
///
/// Unit associations are normalized at construction: a supervised unit is
/// kept only for supervisors and an assigned unit only for workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    role: Role,
    supervised_unit: Option<UnitId>,
    assigned_unit: Option<UnitId>,
}

impl Identity {
    pub fn new(
        user_id: UserId,
        role: Role,
        supervised_unit: Option<UnitId>,
        assigned_unit: Option<UnitId>,
    ) -> Self {
        Self {
            user_id,
            role,
            supervised_unit: supervised_unit.filter(|_| role == Role::Supervisor),
            assigned_unit: assigned_unit.filter(|_| role == Role::Worker),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn supervised_unit(&self) -> Option<&UnitId> {
        self.supervised_unit.as_ref()
    }

    pub fn assigned_unit(&self) -> Option<&UnitId> {
        self.assigned_unit.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The single organizational unit this identity is scoped to
    pub fn unit_id(&self) -> Option<&UnitId> {
        self.supervised_unit
            .as_ref()
            .or(self.assigned_unit.as_ref())
    }
}

impl From<UserRecord> for Identity {
    fn from(record: UserRecord) -> Self {
        Self::new(
            record.id,
            record.role,
            record.supervised_unit,
            record.assigned_unit,
        )
    }
}

/// Immutable snapshot of a report at the moment it was created or updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEvent {
    pub id: ReportId,
    pub unit_id: UnitId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub student_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub unit_name: Option<String>,
    pub student_name: Option<String>,
    pub image_urls: Vec<String>,
}

/// What a metrics snapshot aggregates over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsScope {
    Global,
    Unit(UnitId),
}

impl MetricsScope {
    pub fn unit_id(&self) -> Option<&UnitId> {
        match self {
            Self::Global => None,
            Self::Unit(unit_id) => Some(unit_id),
        }
    }
}

/// Count-based statistics for the whole system or one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub scope: MetricsScope,
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

impl MetricsSnapshot {
    /// Build a snapshot from bucket counts.
    ///
    /// Every report has exactly one status, so `total` is the status sum.
    pub fn from_counts(scope: MetricsScope, status: [u64; 3], priority: [u64; 3]) -> Self {
        let [pending, in_progress, completed] = status;
        let [low, medium, high] = priority;
        Self {
            scope,
            total: pending + in_progress + completed,
            pending,
            in_progress,
            completed,
            low,
            medium,
            high,
        }
    }

    pub fn empty(scope: MetricsScope) -> Self {
        Self::from_counts(scope, [0; 3], [0; 3])
    }
}

/// Filter for report counts and listings; `None` means "any"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub unit_id: Option<UnitId>,
    pub status: Option<ReportStatus>,
    pub priority: Option<ReportPriority>,
    pub created: Option<DateRange>,
}

impl ReportFilter {
    pub fn for_scope(scope: &MetricsScope) -> Self {
        Self {
            unit_id: scope.unit_id().cloned(),
            ..Self::default()
        }
    }

    pub fn with_unit(mut self, unit_id: UnitId) -> Self {
        self.unit_id = Some(unit_id);
        self
    }

    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: ReportPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn created_within(mut self, range: DateRange) -> Self {
        self.created = Some(range);
        self
    }

    pub fn matches(&self, report: &ReportEvent) -> bool {
        self.unit_id.as_ref().is_none_or(|unit| *unit == report.unit_id)
            && self.status.is_none_or(|status| status == report.status)
            && self.priority.is_none_or(|priority| priority == report.priority)
            && self
                .created
                .is_none_or(|range| range.contains(&report.created_at))
    }
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub page: u32,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self { limit, page: 1 }
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.limit) * u64::from(self.page.saturating_sub(1))
    }
}

/// One page of reports plus paging totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPage {
    pub limit: u32,
    pub page: u32,
    pub number_of_pages: u64,
    pub count: u64,
    pub data: Vec<ReportEvent>,
}

impl ReportPage {
    pub fn new(request: PageRequest, count: u64, data: Vec<ReportEvent>) -> Self {
        let number_of_pages = if request.limit == 0 {
            0
        } else {
            count.div_ceil(u64::from(request.limit))
        };
        Self {
            limit: request.limit,
            page: request.page,
            number_of_pages,
            count,
            data,
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(request, 0, Vec::new())
    }
}
