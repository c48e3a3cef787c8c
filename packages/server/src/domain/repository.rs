//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! レポートの作成・更新を行う CRUD 層も同じストアを利用します。
//! ブロードキャスターはこのストアを読み取り専用で使い、書き込みは行いません。

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{
    entity::{PageRequest, ReportEvent, ReportFilter, UserRecord},
    error::RepositoryError,
    value_object::{UnitId, UserId},
};

/// Report Store trait（読み取り専用）
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// フィルタに一致するレポート数
    async fn count(&self, filter: &ReportFilter) -> Result<u64, RepositoryError>;

    /// フィルタに一致するレポートを新しい順に 1 ページ分取得
    async fn find_page(
        &self,
        filter: &ReportFilter,
        page: PageRequest,
    ) -> Result<Vec<ReportEvent>, RepositoryError>;

    /// 全ての組織ユニット ID
    async fn list_unit_ids(&self) -> Result<Vec<UnitId>, RepositoryError>;
}

/// User / organization store trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// ユーザーと、その監督ユニット・所属ユニットを取得
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError>;
}
