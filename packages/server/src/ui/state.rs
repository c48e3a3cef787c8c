//! Server state shared by all handlers.

use std::sync::Arc;

use chrono::FixedOffset;
use reportcast_shared::time::Clock;

use crate::{
    domain::{CredentialVerifier, ReportStore, RoomRegistry, UserStore},
    infrastructure::room_registry::WebSocketRoomRegistry,
    usecase::{
        AuthenticateConnectionUseCase, ComputeMetricsUseCase, DisconnectConnectionUseCase,
        EventBroadcaster, FetchReportsUseCase, ResolveIdentityUseCase,
    },
};

use super::dispatch::RequestDispatcher;

/// Shared application state
pub struct AppState {
    /// ResolveIdentityUseCase（HTTP の管理者認証）
    pub resolve_identity_usecase: Arc<ResolveIdentityUseCase>,
    /// AuthenticateConnectionUseCase（接続認証のユースケース）
    pub authenticate_connection_usecase: Arc<AuthenticateConnectionUseCase>,
    /// DisconnectConnectionUseCase（接続切断のユースケース）
    pub disconnect_connection_usecase: Arc<DisconnectConnectionUseCase>,
    /// EventBroadcaster（レポートイベントのファンアウト）
    pub event_broadcaster: Arc<EventBroadcaster>,
    /// クライアントリクエストのディスパッチテーブル
    pub dispatcher: Arc<RequestDispatcher>,
    /// RoomRegistry（接続とルームの管理）
    pub registry: Arc<dyn RoomRegistry>,
}

/// External collaborators and settings the server is wired from
pub struct Dependencies {
    pub verifier: Arc<dyn CredentialVerifier>,
    pub users: Arc<dyn UserStore>,
    pub reports: Arc<dyn ReportStore>,
    pub clock: Arc<dyn Clock>,
    pub utc_offset: FixedOffset,
    pub page_limit: u32,
}

impl AppState {
    /// Wire the use cases around a fresh room registry
    pub fn new(deps: Dependencies) -> Self {
        // 1. RoomRegistry（WebSocket 実装）
        let registry: Arc<dyn RoomRegistry> = Arc::new(WebSocketRoomRegistry::new());

        // 2. UseCases
        let resolve_identity_usecase =
            Arc::new(ResolveIdentityUseCase::new(deps.verifier, deps.users));
        let authenticate_connection_usecase = Arc::new(AuthenticateConnectionUseCase::new(
            resolve_identity_usecase.clone(),
            registry.clone(),
        ));
        let disconnect_connection_usecase =
            Arc::new(DisconnectConnectionUseCase::new(registry.clone()));
        let compute_metrics_usecase = Arc::new(ComputeMetricsUseCase::new(deps.reports.clone()));
        let event_broadcaster = Arc::new(EventBroadcaster::new(
            registry.clone(),
            compute_metrics_usecase,
            deps.reports.clone(),
        ));
        let fetch_reports_usecase = Arc::new(FetchReportsUseCase::new(
            deps.reports,
            deps.clock,
            deps.utc_offset,
            deps.page_limit,
        ));

        // 3. Request dispatch table
        let dispatcher = Arc::new(RequestDispatcher::standard(
            fetch_reports_usecase,
            event_broadcaster.clone(),
        ));

        Self {
            resolve_identity_usecase,
            authenticate_connection_usecase,
            disconnect_connection_usecase,
            event_broadcaster,
            dispatcher,
            registry,
        }
    }
}
