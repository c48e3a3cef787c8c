//! InMemory User Store 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, UserId, UserRecord, UserStore};

/// インメモリ User Store 実装
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// ユーザーを追加または置き換え
    pub async fn insert(&self, record: UserRecord) {
        self.users.lock().await.insert(record.id.clone(), record);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self.users.lock().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, UnitId};

    #[tokio::test]
    async fn test_find_inserted_user() {
        // テスト項目: 追加したユーザーを ID で取得できる
        // given (前提条件):
        let store = InMemoryUserStore::new();
        let record = UserRecord {
            id: UserId::new("w-1".to_string()).unwrap(),
            role: Role::Worker,
            supervised_unit: None,
            assigned_unit: Some(UnitId::new("infra".to_string()).unwrap()),
        };
        store.insert(record.clone()).await;

        // when (操作):
        let found = store.find_user_by_id(&record.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(found, Some(record));
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        // テスト項目: 存在しないユーザーは None
        // given (前提条件):
        let store = InMemoryUserStore::new();

        // when (操作):
        let found = store
            .find_user_by_id(&UserId::new("ghost".to_string()).unwrap())
            .await
            .unwrap();

        // then (期待する結果):
        assert!(found.is_none());
    }
}
