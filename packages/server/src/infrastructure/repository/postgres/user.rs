//! PostgreSQL User Store 実装
//!
//! 監督者のユニットは `"Department"."supervisorId"`、ワーカーのユニットは
//! `"User"."departmentId"` から解決します。

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{RepositoryError, UnitId, UserId, UserRecord, UserStore, ValueObjectError};

use super::query_failed;

const SELECT_USER: &str = r#"
SELECT
    u."id",
    u."role"::text AS role,
    (
        SELECT d."id" FROM "Department" d WHERE d."supervisorId" = u."id" ORDER BY d."id" LIMIT 1
    ) AS supervised_unit,
    u."departmentId" AS assigned_unit
FROM "User" u
WHERE u."id" = $1
"#;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    role: String,
    supervised_unit: Option<String>,
    assigned_unit: Option<String>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let corrupt = |e: ValueObjectError| {
            RepositoryError::CorruptRecord(format!("user '{}': {}", row.id, e))
        };
        Ok(Self {
            role: row.role.parse().map_err(corrupt)?,
            supervised_unit: row
                .supervised_unit
                .clone()
                .map(UnitId::new)
                .transpose()
                .map_err(corrupt)?,
            assigned_unit: row
                .assigned_unit
                .clone()
                .map(UnitId::new)
                .transpose()
                .map_err(corrupt)?,
            id: UserId::new(row.id.clone()).map_err(corrupt)?,
        })
    }
}

/// PostgreSQL User Store 実装
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as::<_, UserRow>(SELECT_USER)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed)?;
        row.map(UserRecord::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn test_row_to_supervisor_record() {
        // テスト項目: 監督者の行が監督ユニット付きのレコードに変換される
        // given (前提条件):
        let row = UserRow {
            id: "sup-1".to_string(),
            role: "supervisor".to_string(),
            supervised_unit: Some("infra".to_string()),
            assigned_unit: None,
        };

        // when (操作):
        let record = UserRecord::try_from(row).unwrap();

        // then (期待する結果):
        assert_eq!(record.role, Role::Supervisor);
        assert_eq!(record.supervised_unit.map(UnitId::into_string), Some("infra".to_string()));
    }

    #[test]
    fn test_row_with_unknown_role_is_corrupt() {
        // テスト項目: 未知のロールは CorruptRecord になる
        // given (前提条件):
        let row = UserRow {
            id: "u-1".to_string(),
            role: "janitor".to_string(),
            supervised_unit: None,
            assigned_unit: None,
        };

        // when (操作):
        let result = UserRecord::try_from(row);

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::CorruptRecord(_))));
    }
}
