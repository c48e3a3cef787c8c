//! UseCase: 接続の切断処理
//!
//! 全てのルームから接続を外し、registry から sender を破棄します。
//! sender が破棄されると、ソケット側の pusher ループは残りのフレームを送り切って終了します。

use std::{collections::BTreeSet, sync::Arc};

use crate::domain::{Connection, RoomId, RoomRegistry};

/// 接続切断のユースケース
pub struct DisconnectConnectionUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl DisconnectConnectionUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 接続を Closed にし、退出したルームを返す（冪等）
    pub async fn execute(&self, connection: &mut Connection) -> BTreeSet<RoomId> {
        let mut left = connection.close();
        left.extend(self.registry.unregister_client(connection.id()).await);

        tracing::info!(
            "Connection {} closed, left {} room(s)",
            connection.id(),
            left.len()
        );
        left
    }
}
