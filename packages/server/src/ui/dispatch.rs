//! Client request dispatch.
//!
//! Requests are routed through an explicit table keyed by event name. Every
//! request requires an authenticated connection; the handler's reply (if any)
//! is pushed back to the requesting connection only.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    domain::{Connection, Identity, OutboundMessage},
    infrastructure::dto::websocket::ClientRequest,
    usecase::{EventBroadcaster, FetchReportsError, FetchReportsUseCase},
};

pub const GET_INITIAL_RECENT_REPORTS: &str = "getInitialRecentReports";
pub const GET_ANNUAL_REPORTS: &str = "getAnnualReports";
pub const GET_INITIAL_METRICS: &str = "getInitialMetrics";

/// Request failures; messages are safe to show to clients
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("malformed request")]
    Malformed,

    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("failed to load reports")]
    Fetch(#[from] FetchReportsError),
}

#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handle one request; `Some` is pushed back to the requester
    async fn handle(
        &self,
        identity: &Identity,
        data: Option<serde_json::Value>,
    ) -> Result<Option<OutboundMessage>, RequestError>;
}

pub struct RecentReportsHandler {
    fetch: Arc<FetchReportsUseCase>,
}

impl RecentReportsHandler {
    pub fn new(fetch: Arc<FetchReportsUseCase>) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl RequestHandler for RecentReportsHandler {
    async fn handle(
        &self,
        identity: &Identity,
        _data: Option<serde_json::Value>,
    ) -> Result<Option<OutboundMessage>, RequestError> {
        let page = self.fetch.recent(identity).await?;
        Ok(Some(OutboundMessage::InitialRecentReports(page)))
    }
}

pub struct AnnualReportsHandler {
    fetch: Arc<FetchReportsUseCase>,
}

impl AnnualReportsHandler {
    pub fn new(fetch: Arc<FetchReportsUseCase>) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl RequestHandler for AnnualReportsHandler {
    async fn handle(
        &self,
        identity: &Identity,
        _data: Option<serde_json::Value>,
    ) -> Result<Option<OutboundMessage>, RequestError> {
        let page = self.fetch.annual(identity).await?;
        Ok(Some(OutboundMessage::AnnualReports(page)))
    }
}

/// Runs a full refresh cycle; the requester receives the push for its room
pub struct MetricsRefreshHandler {
    broadcaster: Arc<EventBroadcaster>,
}

impl MetricsRefreshHandler {
    pub fn new(broadcaster: Arc<EventBroadcaster>) -> Self {
        Self { broadcaster }
    }
}

#[async_trait]
impl RequestHandler for MetricsRefreshHandler {
    async fn handle(
        &self,
        _identity: &Identity,
        _data: Option<serde_json::Value>,
    ) -> Result<Option<OutboundMessage>, RequestError> {
        self.broadcaster.refresh_metrics().await;
        Ok(None)
    }
}

/// Event name → handler table
#[derive(Default)]
pub struct RequestDispatcher {
    handlers: HashMap<&'static str, Arc<dyn RequestHandler>>,
}

impl RequestDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three requests served on the reports channel
    pub fn standard(fetch: Arc<FetchReportsUseCase>, broadcaster: Arc<EventBroadcaster>) -> Self {
        Self::new()
            .register(
                GET_INITIAL_RECENT_REPORTS,
                Arc::new(RecentReportsHandler::new(fetch.clone())),
            )
            .register(GET_ANNUAL_REPORTS, Arc::new(AnnualReportsHandler::new(fetch)))
            .register(
                GET_INITIAL_METRICS,
                Arc::new(MetricsRefreshHandler::new(broadcaster)),
            )
    }

    pub fn register(mut self, event: &'static str, handler: Arc<dyn RequestHandler>) -> Self {
        self.handlers.insert(event, handler);
        self
    }

    /// Handle one inbound text frame and return the reply for the requester
    pub async fn dispatch(&self, connection: &Connection, text: &str) -> Option<OutboundMessage> {
        let request = match serde_json::from_str::<ClientRequest>(text) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!("Malformed frame from {}: {}", connection.id(), e);
                return Some(OutboundMessage::request_error(
                    RequestError::Malformed.to_string(),
                ));
            }
        };

        let Some(identity) = connection.identity() else {
            return Some(OutboundMessage::auth_error("not authenticated"));
        };

        let Some(handler) = self.handlers.get(request.event.as_str()) else {
            tracing::debug!(
                "Unknown event '{}' from {}",
                request.event,
                connection.id()
            );
            return Some(OutboundMessage::request_error(
                RequestError::UnknownEvent(request.event).to_string(),
            ));
        };

        tracing::debug!("Dispatching '{}' for {}", request.event, connection.id());
        match handler.handle(identity, request.data).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    "Request '{}' from {} failed: {:?}",
                    request.event,
                    connection.id(),
                    e
                );
                Some(OutboundMessage::request_error(e.to_string()))
            }
        }
    }
}
