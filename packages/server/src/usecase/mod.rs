//! UseCase 層
//!
//! 接続の認証・切断、レポートイベントのファンアウト、メトリクスの集計、
//! オンデマンドのレポート取得を扱います。各ユースケースはドメイン層の trait（ポート）
//! にのみ依存します。

pub mod authenticate_connection;
pub mod broadcast_report_event;
pub mod compute_metrics;
pub mod disconnect_connection;
pub mod error;
pub mod fetch_reports;
pub mod resolve_identity;

pub use authenticate_connection::AuthenticateConnectionUseCase;
pub use broadcast_report_event::{EventBroadcaster, RefreshSummary};
pub use compute_metrics::ComputeMetricsUseCase;
pub use disconnect_connection::DisconnectConnectionUseCase;
pub use error::{ConnectError, FetchReportsError, MetricsError};
pub use fetch_reports::FetchReportsUseCase;
pub use resolve_identity::ResolveIdentityUseCase;
