//! # UserRoleRepository
//!
//! ユーザーに割り当てられたロールの取得を担当するリポジトリ。
//!
//! ロールは `"tabHas Role"` 子テーブルにユーザー単位で保持される。

use async_trait::async_trait;
use purgeflow_domain::user::{RoleName, UserId};
use sqlx::PgPool;

use crate::error::InfraError;

/// ユーザーロールリポジトリトレイト
#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    /// ユーザーのロールを宣言順に取得する
    ///
    /// ユーザーが存在しない場合は空の Vec を返す。
    async fn find_roles(&self, user_id: &UserId) -> Result<Vec<RoleName>, InfraError>;
}

/// PostgreSQL 実装の UserRoleRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRoleRepository {
    pool: PgPool,
}

impl PostgresUserRoleRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRoleRepository for PostgresUserRoleRepository {
    async fn find_roles(&self, user_id: &UserId) -> Result<Vec<RoleName>, InfraError> {
        let roles: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT role
            FROM "tabHas Role"
            WHERE parent = $1 AND COALESCE(role, '') <> ''
            ORDER BY idx
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        roles
            .into_iter()
            .map(|role| RoleName::new(role).map_err(|e| InfraError::unexpected(e.to_string())))
            .collect()
    }
}
