//! Room registry trait 定義
//!
//! 接続中のクライアントと、ルーム（ブロードキャストグループ）のメンバーシップを管理する
//! インターフェースです。認証・切断・ブロードキャストは全てこの trait を経由します。
//!
//! ## 一貫性
//!
//! 実装は join / leave とルームメンバーの走査を直列化しなければなりません。
//! 切断済みの接続にブロードキャストが届いたり、参加直後の接続が一部のメッセージだけ
//! 取りこぼしたりしないようにするためです。

use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::MessagePushError,
    message::OutboundMessage,
    value_object::{ConnectionId, RoomId},
};

/// Outbound channel of one connection; the socket task drains the receiver
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Member count of a live room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMembership {
    pub room: RoomId,
    pub members: usize,
}

#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// クライアントを登録（ルームには未参加）
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// クライアントを登録解除し、参加していた全ルームから外す
    ///
    /// 戻り値は退出したルーム。未登録の接続に対しても冪等。
    async fn unregister_client(&self, connection_id: &ConnectionId) -> BTreeSet<RoomId>;

    /// Replace the rooms a connection belongs to
    async fn assign_rooms(
        &self,
        connection_id: &ConnectionId,
        rooms: &BTreeSet<RoomId>,
    ) -> Result<(), MessagePushError>;

    /// 特定のクライアントにメッセージを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        message: &OutboundMessage,
    ) -> Result<(), MessagePushError>;

    /// ルームの全メンバーに送信し、届いた接続数を返す
    ///
    /// メンバーがいないルームへの送信は何もしない（エラーではない）。
    async fn broadcast_to_room(&self, room: &RoomId, message: &OutboundMessage) -> usize;

    /// Current members of a room
    async fn members_of(&self, room: &RoomId) -> Vec<ConnectionId>;

    /// All non-empty rooms, ordered by room id
    async fn rooms(&self) -> Vec<RoomMembership>;
}
