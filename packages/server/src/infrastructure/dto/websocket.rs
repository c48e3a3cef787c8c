//! WebSocket message DTOs.
//!
//! Every frame is a JSON text envelope `{"event": <name>, "data": <payload>}`;
//! `data` is omitted for events without a payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client → server request envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRequest {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ClientRequest {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: None,
        }
    }
}

/// Server → client event envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "authenticated")]
    Authenticated,
    #[serde(rename = "error")]
    Error(ErrorPayload),
    #[serde(rename = "newReport")]
    NewReport(ReportDto),
    #[serde(rename = "reportUpdate")]
    ReportUpdate(ReportDto),
    #[serde(rename = "reportDeleted")]
    ReportDeleted(ReportDeletedDto),
    #[serde(rename = "metrics")]
    Metrics(MetricsDto),
    #[serde(rename = "initialRecentReports")]
    InitialRecentReports(ReportPageDto),
    #[serde(rename = "annualReports")]
    AnnualReports(ReportPageDto),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(rename = "type")]
    pub r#type: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDto {
    pub id: String,
    pub unit_id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub status: String,
    pub priority: String,
    #[serde(default)]
    pub student_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub unit_name: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDeletedDto {
    pub id: String,
    pub unit_id: String,
}

/// Metrics payload; field names follow the established dashboard contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDto {
    /// `"global"` or the unit id
    pub scope: String,
    pub total_reports: u64,
    pub reports_pending: u64,
    pub reports_in_progress: u64,
    pub reports_completed: u64,
    pub low_priority_reports: u64,
    pub medium_priority_reports: u64,
    pub high_priority_reports: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPageDto {
    pub limit: u32,
    pub page: u32,
    pub number_of_pages: u64,
    pub count: u64,
    pub data: Vec<ReportDto>,
}
