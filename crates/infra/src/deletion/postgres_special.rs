//! # 特別経路の PostgreSQL Deleter
//!
//! 会社へのリンクフィールドを持たないが、他のレコード経由で会社に属する
//! DocType を削除する。単一の `DELETE ... WHERE ... $1` パターンをマクロで共通化する。

use async_trait::async_trait;
use purgeflow_domain::company::CompanyName;

use super::{CompanyDeleter, DeletionResult};
use crate::{db::TxContext, error::InfraError};

/// 会社名を `$1` に取る単一 DELETE 文の Deleter を定義するマクロ
macro_rules! define_special_postgres_deleter {
    (
        name: $name:ident,
        deleter_name: $deleter_name:literal,
        delete_sql: $delete_sql:literal,
        doc: $doc:literal
    ) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Default)]
        pub struct $name;

        impl $name {
            pub fn new() -> Self {
                Self
            }
        }

        #[async_trait]
        impl CompanyDeleter for $name {
            fn name(&self) -> &'static str {
                $deleter_name
            }

            async fn delete(
                &self,
                tx: &mut TxContext,
                company: &CompanyName,
            ) -> Result<DeletionResult, InfraError> {
                let result = sqlx::query($delete_sql)
                    .bind(company.as_str())
                    .execute(tx.conn())
                    .await?;

                Ok(DeletionResult {
                    deleted_count: result.rows_affected(),
                })
            }
        }
    };
}

define_special_postgres_deleter!(
    name: PostgresBinDeleter,
    deleter_name: "postgres:bin",
    delete_sql: r#"
        DELETE FROM "tabBin"
        WHERE warehouse IN (
            SELECT name FROM "tabWarehouse" WHERE company = $1
        )
    "#,
    doc: "在庫数量（Bin）Deleter\n\nBin は倉庫経由で会社に属する。倉庫自体は削除しない。"
);

define_special_postgres_deleter!(
    name: PostgresTimeLogDeleter,
    deleter_name: "postgres:time_log",
    delete_sql: r#"
        DELETE FROM "tabTime Log" AS tl
        WHERE (
            COALESCE(tl.project, '') <> ''
            AND EXISTS (
                SELECT 1 FROM "tabProject" p
                WHERE p.name = tl.project AND p.company = $1
            )
        ) OR (
            COALESCE(tl.task, '') <> ''
            AND EXISTS (
                SELECT 1 FROM "tabTask" t
                WHERE t.name = tl.task AND t.company = $1
            )
        ) OR (
            COALESCE(tl.production_order, '') <> ''
            AND EXISTS (
                SELECT 1 FROM "tabProduction Order" po
                WHERE po.name = tl.production_order AND po.company = $1
            )
        ) OR (
            COALESCE(tl.sales_invoice, '') <> ''
            AND EXISTS (
                SELECT 1 FROM "tabSales Invoice" si
                WHERE si.name = tl.sales_invoice AND si.company = $1
            )
        )
    "#,
    doc: "作業時間記録（Time Log）Deleter\n\nプロジェクト・タスク・製造指図・売上請求書のいずれかが会社に属していれば削除する。\n参照先のレコードがすでに削除されている場合は一致しない。"
);
