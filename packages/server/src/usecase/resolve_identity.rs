//! UseCase: ベアラー資格情報からアイデンティティを解決
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ResolveIdentityUseCase::execute() メソッド
//! - 署名・期限の検証と、ユーザーレコードの検索
//!
//! ### どのような状況を想定しているか
//! - 正常系：有効なトークンと既存ユーザー
//! - 異常系：検証失敗、ユーザー不在、ストア障害

use std::sync::Arc;

use crate::domain::{AuthError, CredentialVerifier, Identity, UserStore};

/// アイデンティティ解決のユースケース（副作用なし）
pub struct ResolveIdentityUseCase {
    verifier: Arc<dyn CredentialVerifier>,
    users: Arc<dyn UserStore>,
}

impl ResolveIdentityUseCase {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, users: Arc<dyn UserStore>) -> Self {
        Self { verifier, users }
    }

    /// 資格情報を検証し、ユーザーと組織上のスコープを返す
    pub async fn execute(&self, credential: &str) -> Result<Identity, AuthError> {
        let verified = self.verifier.verify(credential).map_err(|e| {
            tracing::debug!("Credential verification failed: {}", e);
            AuthError::InvalidCredential
        })?;

        let record = self
            .users
            .find_user_by_id(&verified.user_id)
            .await
            .map_err(|e| AuthError::IdentityLookupFailed(e.to_string()))?
            .ok_or(AuthError::UnknownUser)?;

        Ok(Identity::from(record))
    }
}
