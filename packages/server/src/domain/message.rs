//! Messages pushed from the server to connected clients.

use super::{
    entity::{MetricsSnapshot, ReportEvent, ReportPage},
    value_object::{ReportId, UnitId},
};

/// Category carried by an `error` event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Request,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Request => "request",
        }
    }
}

/// Server → client event, independent of the wire encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Authenticated,
    Error { kind: ErrorKind, message: String },
    NewReport(ReportEvent),
    ReportUpdate(ReportEvent),
    ReportDeleted { id: ReportId, unit_id: UnitId },
    Metrics(MetricsSnapshot),
    InitialRecentReports(ReportPage),
    AnnualReports(ReportPage),
}

impl OutboundMessage {
    pub fn auth_error(message: impl Into<String>) -> Self {
        Self::Error {
            kind: ErrorKind::Auth,
            message: message.into(),
        }
    }

    pub fn request_error(message: impl Into<String>) -> Self {
        Self::Error {
            kind: ErrorKind::Request,
            message: message.into(),
        }
    }

    /// Event name on the wire
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::Error { .. } => "error",
            Self::NewReport(_) => "newReport",
            Self::ReportUpdate(_) => "reportUpdate",
            Self::ReportDeleted { .. } => "reportDeleted",
            Self::Metrics(_) => "metrics",
            Self::InitialRecentReports(_) => "initialRecentReports",
            Self::AnnualReports(_) => "annualReports",
        }
    }
}
