//! Conversion logic between domain entities and DTOs.

use crate::domain::{
    ConnectionId, MessagePushError, MetricsScope, MetricsSnapshot, OutboundMessage, ReportEvent,
    ReportId, ReportPage, RoomId, RoomMembership, UnitId, UserId, ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as dto};

/// Encode an outbound message as one JSON text frame
pub fn encode(message: &OutboundMessage) -> Result<String, MessagePushError> {
    serde_json::to_string(&dto::ServerEvent::from(message))
        .map_err(|e| MessagePushError::Encode(e.to_string()))
}

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::ReportDto> for ReportEvent {
    type Error = ValueObjectError;

    fn try_from(dto: dto::ReportDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ReportId::new(dto.id)?,
            unit_id: UnitId::new(dto.unit_id)?,
            title: dto.title,
            description: dto.description,
            location: dto.location,
            status: dto.status.parse()?,
            priority: dto.priority.parse()?,
            student_id: dto.student_id.map(UserId::new).transpose()?,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
            unit_name: dto.unit_name,
            student_name: dto.student_name,
            image_urls: dto.images,
        })
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ReportEvent> for dto::ReportDto {
    fn from(model: &ReportEvent) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            unit_id: model.unit_id.as_str().to_string(),
            title: model.title.clone(),
            description: model.description.clone(),
            location: model.location.clone(),
            status: model.status.as_str().to_string(),
            priority: model.priority.as_str().to_string(),
            student_id: model.student_id.as_ref().map(|id| id.as_str().to_string()),
            created_at: model.created_at,
            updated_at: model.updated_at,
            unit_name: model.unit_name.clone(),
            student_name: model.student_name.clone(),
            images: model.image_urls.clone(),
        }
    }
}

impl From<&MetricsSnapshot> for dto::MetricsDto {
    fn from(model: &MetricsSnapshot) -> Self {
        let scope = match &model.scope {
            MetricsScope::Global => "global".to_string(),
            MetricsScope::Unit(unit_id) => unit_id.as_str().to_string(),
        };
        Self {
            scope,
            total_reports: model.total,
            reports_pending: model.pending,
            reports_in_progress: model.in_progress,
            reports_completed: model.completed,
            low_priority_reports: model.low,
            medium_priority_reports: model.medium,
            high_priority_reports: model.high,
        }
    }
}

impl From<&ReportPage> for dto::ReportPageDto {
    fn from(model: &ReportPage) -> Self {
        Self {
            limit: model.limit,
            page: model.page,
            number_of_pages: model.number_of_pages,
            count: model.count,
            data: model.data.iter().map(dto::ReportDto::from).collect(),
        }
    }
}

impl From<&OutboundMessage> for dto::ServerEvent {
    fn from(model: &OutboundMessage) -> Self {
        match model {
            OutboundMessage::Authenticated => Self::Authenticated,
            OutboundMessage::Error { kind, message } => Self::Error(dto::ErrorPayload {
                r#type: kind.as_str().to_string(),
                message: message.clone(),
            }),
            OutboundMessage::NewReport(report) => Self::NewReport(report.into()),
            OutboundMessage::ReportUpdate(report) => Self::ReportUpdate(report.into()),
            OutboundMessage::ReportDeleted { id, unit_id } => {
                Self::ReportDeleted(dto::ReportDeletedDto {
                    id: id.as_str().to_string(),
                    unit_id: unit_id.as_str().to_string(),
                })
            }
            OutboundMessage::Metrics(snapshot) => Self::Metrics(snapshot.into()),
            OutboundMessage::InitialRecentReports(page) => Self::InitialRecentReports(page.into()),
            OutboundMessage::AnnualReports(page) => Self::AnnualReports(page.into()),
        }
    }
}

impl From<RoomMembership> for http::RoomSummaryDto {
    fn from(model: RoomMembership) -> Self {
        Self {
            id: model.room.as_str().to_string(),
            members: model.members,
        }
    }
}

impl http::RoomDetailDto {
    pub fn new(room: &RoomId, members: &[ConnectionId]) -> Self {
        Self {
            id: room.as_str().to_string(),
            unit_id: room.unit_id().map(|unit_id| unit_id.into_string()),
            members: members.iter().map(ToString::to_string).collect(),
        }
    }
}
