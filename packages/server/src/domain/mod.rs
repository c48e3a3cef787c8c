//! ドメイン層
//!
//! 接続、アイデンティティ、ルーム、レポートとメトリクスのスナップショットを定義します。
//! 外部ストアや WebSocket への依存は trait（ポート）として定義し、
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod connection;
pub mod credential;
pub mod entity;
pub mod error;
pub mod message;
pub mod registry;
pub mod repository;
pub mod room_router;
pub mod value_object;

pub use connection::{Connection, ConnectionState, Handshake, extract_credential};
pub use credential::{CredentialVerifier, VerifiedCredential};
pub use entity::{
    Identity, MetricsScope, MetricsSnapshot, PageRequest, ReportEvent, ReportFilter, ReportPage,
    UserRecord,
};
pub use error::{
    AuthError, ConnectionError, CredentialError, MessagePushError, RepositoryError,
    ValueObjectError,
};
pub use message::{ErrorKind, OutboundMessage};
pub use registry::{PusherChannel, RoomMembership, RoomRegistry};
pub use repository::{ReportStore, UserStore};
pub use room_router::rooms_for;
pub use value_object::{
    ConnectionId, ReportId, ReportPriority, ReportStatus, Role, RoomId, UnitId, UserId,
};
