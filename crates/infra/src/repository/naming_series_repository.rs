//! # NamingSeriesRepository
//!
//! 採番シリーズのカウンター（`"tabSeries"`）の読み書きを担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **トランザクション必須**: 削除と同じトランザクションで実行し、
//!   削除がロールバックされたらカウンターも元に戻る
//! - **長い接頭辞の除外**: 短い接頭辞の検索から、それを先頭に含む長い接頭辞の ID を
//!   `NOT LIKE` で除外する（[`purgeflow_domain::naming_series`] を参照）
//! - **upsert**: カウンター行がなければ作成する

use async_trait::async_trait;
use purgeflow_domain::doctype::DocTypeName;

use crate::{
    db::TxContext,
    error::InfraError,
    sql::{LIKE_ESCAPE, like_prefix, table_ident},
};

/// 採番シリーズリポジトリトレイト
#[async_trait]
pub trait NamingSeriesRepository: Send + Sync {
    /// `prefix` で始まる残存レコードの最大の `name` を返す
    ///
    /// `shadowing` に含まれる接頭辞で始まる `name` は対象外。
    /// 該当がなければ `None`。
    async fn max_name_with_prefix(
        &self,
        tx: &mut TxContext,
        doctype: &DocTypeName,
        prefix: &str,
        shadowing: &[&str],
    ) -> Result<Option<String>, InfraError>;

    /// 接頭辞のカウンターを設定する
    async fn upsert_current(
        &self,
        tx: &mut TxContext,
        prefix: &str,
        current: i64,
    ) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の NamingSeriesRepository
#[derive(Debug, Clone, Default)]
pub struct PostgresNamingSeriesRepository;

impl PostgresNamingSeriesRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new() -> Self {
        Self
    }
}

/// 最大 ID を探す SELECT 文を組み立てる
///
/// `$1` が `prefix` の LIKE パターン、`$2` 以降が除外する接頭辞のパターン。
fn max_name_sql(doctype: &DocTypeName, shadowing_count: usize) -> String {
    let escape = LIKE_ESCAPE;
    let mut sql = format!(
        "SELECT MAX(name) FROM {} WHERE name LIKE $1 ESCAPE '{escape}'",
        table_ident(doctype)
    );
    for i in 0..shadowing_count {
        sql.push_str(&format!(" AND name NOT LIKE ${} ESCAPE '{escape}'", i + 2));
    }
    sql
}

#[async_trait]
impl NamingSeriesRepository for PostgresNamingSeriesRepository {
    async fn max_name_with_prefix(
        &self,
        tx: &mut TxContext,
        doctype: &DocTypeName,
        prefix: &str,
        shadowing: &[&str],
    ) -> Result<Option<String>, InfraError> {
        let sql = max_name_sql(doctype, shadowing.len());

        let mut query = sqlx::query_scalar::<_, Option<String>>(&sql).bind(like_prefix(prefix));
        for longer in shadowing {
            query = query.bind(like_prefix(longer));
        }

        let max = query.fetch_one(tx.conn()).await?;
        Ok(max)
    }

    async fn upsert_current(
        &self,
        tx: &mut TxContext,
        prefix: &str,
        current: i64,
    ) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO "tabSeries" (name, current)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET current = EXCLUDED.current
            "#,
        )
        .bind(prefix)
        .bind(current)
        .execute(tx.conn())
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_除外なしのsqlは前方一致のみ() {
        let doctype = DocTypeName::new("Sales Invoice").unwrap();

        assert_eq!(
            max_name_sql(&doctype, 0),
            r#"SELECT MAX(name) FROM "tabSales Invoice" WHERE name LIKE $1 ESCAPE '\'"#
        );
    }

    #[test]
    fn test_除外する接頭辞ごとにnot_likeが追加される() {
        let doctype = DocTypeName::new("Sales Invoice").unwrap();

        let sql = max_name_sql(&doctype, 2);

        assert!(sql.ends_with(
            r#"name LIKE $1 ESCAPE '\' AND name NOT LIKE $2 ESCAPE '\' AND name NOT LIKE $3 ESCAPE '\'"#
        ));
    }
}
