//! WebSocket を使った RoomRegistry 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - ルーム（`admins` / `unit_<id>`）とメンバーの対応を管理
//! - メッセージを JSON にエンコードして送信（push_to, broadcast_to_room）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//!
//! 接続・ルーム・メンバーシップは 1 つの Mutex で保護します。参加・退出とブロードキャスト時の
//! メンバー走査は同じロックを取るため、半分だけ削除された接続が見えることはありません。
//! 送信はチャンネルへのキューイングのみで、ロック中に I/O を待つことはありません。

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ConnectionId, MessagePushError, OutboundMessage, PusherChannel, RoomId, RoomMembership,
        RoomRegistry,
    },
    infrastructure::dto::conversion::encode,
};

#[derive(Default)]
struct RegistryState {
    clients: HashMap<ConnectionId, PusherChannel>,
    /// 空のルームは保持しない
    rooms: BTreeMap<RoomId, BTreeSet<ConnectionId>>,
    memberships: HashMap<ConnectionId, BTreeSet<RoomId>>,
}

impl RegistryState {
    fn leave_all(&mut self, connection_id: &ConnectionId) -> BTreeSet<RoomId> {
        let left = self.memberships.remove(connection_id).unwrap_or_default();
        for room in &left {
            if let Some(members) = self.rooms.get_mut(room) {
                members.remove(connection_id);
                if members.is_empty() {
                    self.rooms.remove(room);
                }
            }
        }
        left
    }
}

/// WebSocket を使った RoomRegistry 実装
///
/// ## 使用例
///
/// ```ignore
/// let registry = WebSocketRoomRegistry::new();
/// registry.register_client(connection_id, tx).await;
/// registry.assign_rooms(&connection_id, &BTreeSet::from([RoomId::admins()])).await?;
///
/// registry.broadcast_to_room(&RoomId::admins(), &OutboundMessage::Authenticated).await;
/// ```
#[derive(Default)]
pub struct WebSocketRoomRegistry {
    state: Mutex<RegistryState>,
}

impl WebSocketRoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRegistry for WebSocketRoomRegistry {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut state = self.state.lock().await;
        state.clients.insert(connection_id, sender);
        tracing::debug!("Connection {} registered", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) -> BTreeSet<RoomId> {
        let mut state = self.state.lock().await;
        let left = state.leave_all(connection_id);
        if state.clients.remove(connection_id).is_some() {
            tracing::debug!("Connection {} unregistered", connection_id);
        }
        left
    }

    async fn assign_rooms(
        &self,
        connection_id: &ConnectionId,
        rooms: &BTreeSet<RoomId>,
    ) -> Result<(), MessagePushError> {
        let mut state = self.state.lock().await;
        if !state.clients.contains_key(connection_id) {
            return Err(MessagePushError::ClientNotFound(connection_id.to_string()));
        }

        state.leave_all(connection_id);
        for room in rooms {
            state
                .rooms
                .entry(room.clone())
                .or_default()
                .insert(*connection_id);
        }
        if !rooms.is_empty() {
            state.memberships.insert(*connection_id, rooms.clone());
        }
        Ok(())
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        message: &OutboundMessage,
    ) -> Result<(), MessagePushError> {
        let text = encode(message)?;
        let state = self.state.lock().await;

        let sender = state
            .clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        sender
            .send(text)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!(
            "Pushed '{}' to connection {}",
            message.event_name(),
            connection_id
        );
        Ok(())
    }

    async fn broadcast_to_room(&self, room: &RoomId, message: &OutboundMessage) -> usize {
        let text = match encode(message) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Dropping '{}' for room {}: {}", message.event_name(), room, e);
                return 0;
            }
        };

        let state = self.state.lock().await;
        let Some(members) = state.rooms.get(room) else {
            return 0;
        };

        let mut delivered = 0;
        for member in members {
            match state.clients.get(member) {
                // 受信側が既に閉じている接続は切断処理の途中なので無視する
                Some(sender) => match sender.send(text.clone()) {
                    Ok(()) => delivered += 1,
                    Err(_) => tracing::debug!("Connection {} is gone, skipping", member),
                },
                None => tracing::debug!("Connection {} not registered, skipping", member),
            }
        }
        tracing::debug!(
            "Broadcast '{}' to room {} ({} delivered)",
            message.event_name(),
            room,
            delivered
        );
        delivered
    }

    async fn members_of(&self, room: &RoomId) -> Vec<ConnectionId> {
        let state = self.state.lock().await;
        state
            .rooms
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    async fn rooms(&self) -> Vec<RoomMembership> {
        let state = self.state.lock().await;
        state
            .rooms
            .iter()
            .map(|(room, members)| RoomMembership {
                room: room.clone(),
                members: members.len(),
            })
            .collect()
    }
}
