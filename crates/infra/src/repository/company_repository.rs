//! # CompanyRepository
//!
//! 会社レコードの取得を担当するリポジトリ。
//!
//! 会社の作成・更新はこのクレートの責務ではないため、読み取りのみを提供する。

use async_trait::async_trait;
use purgeflow_domain::{
    company::{Company, CompanyName},
    user::UserId,
};
use sqlx::PgPool;

use crate::error::InfraError;

/// 会社リポジトリトレイト
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// 名前で会社を検索
    async fn find_by_name(&self, name: &CompanyName) -> Result<Option<Company>, InfraError>;
}

/// PostgreSQL 実装の CompanyRepository
#[derive(Debug, Clone)]
pub struct PostgresCompanyRepository {
    pool: PgPool,
}

impl PostgresCompanyRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn find_by_name(&self, name: &CompanyName) -> Result<Option<Company>, InfraError> {
        let row: Option<(String, Option<String>)> = sqlx::query_as(
            r#"
            SELECT name, owner
            FROM "tabCompany"
            WHERE name = $1
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some((name, owner)) = row else {
            return Ok(None);
        };

        let company = Company::from_db(
            CompanyName::new(name).map_err(|e| InfraError::unexpected(e.to_string()))?,
            UserId::new(owner.unwrap_or_default())
                .map_err(|e| InfraError::unexpected(e.to_string()))?,
        );

        Ok(Some(company))
    }
}
