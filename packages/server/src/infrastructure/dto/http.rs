//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::ReportDto;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub members: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    /// Unit id for unit rooms, absent for `admins`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    /// Connection ids of the current members
    pub members: Vec<String>,
}

/// Mutation notice posted by the CRUD layer after a durable write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReportNoticeDto {
    Created {
        report: ReportDto,
    },
    Updated {
        report: ReportDto,
    },
    #[serde(rename_all = "camelCase")]
    Deleted {
        id: String,
        unit_id: String,
    },
}
