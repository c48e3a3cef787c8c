//! UseCase: 接続のハンドシェイク認証
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AuthenticateConnectionUseCase::execute() メソッド
//! - 資格情報の抽出 → アイデンティティ解決 → `authenticated` 送信 → ルーム割り当て
//!
//! ### なぜこのテストが必要か
//! - 認証に失敗した接続がルームに参加しないことを保証する
//! - 失敗時にクライアントへ構造化された `error` が 1 件届くことを確認する
//! - ルーム参加と同時に届いたブロードキャストより先に `authenticated` が届くことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：管理者・ワーカーの認証
//! - 異常系：資格情報なし（リゾルバは呼ばれない）、無効なトークン

use std::sync::Arc;

use crate::domain::{
    AuthError, Connection, Handshake, Identity, OutboundMessage, RoomRegistry, extract_credential,
    rooms_for,
};

use super::{error::ConnectError, resolve_identity::ResolveIdentityUseCase};

/// 接続認証のユースケース
pub struct AuthenticateConnectionUseCase {
    resolver: Arc<ResolveIdentityUseCase>,
    registry: Arc<dyn RoomRegistry>,
}

impl AuthenticateConnectionUseCase {
    pub fn new(resolver: Arc<ResolveIdentityUseCase>, registry: Arc<dyn RoomRegistry>) -> Self {
        Self { resolver, registry }
    }

    /// ハンドシェイクを検証し、接続を Authenticated か Rejected に遷移させる
    ///
    /// 接続は事前に registry へ登録済みであること。
    /// Rejected の場合は `error` を送信済みで、ソケットのクローズは呼び出し側が行う。
    pub async fn execute(
        &self,
        connection: &mut Connection,
        handshake: &Handshake,
    ) -> Result<Identity, ConnectError> {
        connection.begin_authentication()?;

        let identity = match self.resolve(handshake).await {
            Ok(identity) => identity,
            Err(reason) => return Err(self.reject(connection, reason).await),
        };

        let rooms = rooms_for(&identity);
        connection.authenticate(identity.clone(), rooms.clone())?;
        // The ack is queued before joining so it precedes every room push
        self.registry
            .push_to(connection.id(), &OutboundMessage::Authenticated)
            .await?;
        self.registry.assign_rooms(connection.id(), &rooms).await?;

        tracing::info!(
            "Connection {} authenticated as '{}' ({}), rooms: {:?}",
            connection.id(),
            identity.user_id(),
            identity.role().as_str(),
            connection
                .rooms()
                .iter()
                .map(|room| room.as_str())
                .collect::<Vec<_>>()
        );
        Ok(identity)
    }

    async fn resolve(&self, handshake: &Handshake) -> Result<Identity, AuthError> {
        let credential = extract_credential(handshake).ok_or(AuthError::MissingCredential)?;
        self.resolver.execute(&credential).await
    }

    async fn reject(&self, connection: &mut Connection, reason: AuthError) -> ConnectError {
        tracing::warn!("Connection {} rejected: {}", connection.id(), reason);

        if let Err(e) = connection.reject(reason.clone()) {
            return e.into();
        }
        let message = OutboundMessage::auth_error(reason.to_string());
        if let Err(e) = self.registry.push_to(connection.id(), &message).await {
            tracing::debug!("Could not deliver auth error to {}: {}", connection.id(), e);
        }
        reason.into()
    }
}
