//! # PostgresDocTypeRecordStore
//!
//! メタデータで解決した DocType テーブルの行を削除する。
//!
//! テーブル名・列名は検証済みの値オブジェクトを引用符付きで埋め込み、
//! 会社名はバインドパラメータで渡す。

use async_trait::async_trait;
use purgeflow_domain::{
    company::CompanyName,
    doctype::{DocTypeName, FieldName},
};

use super::DocTypeRecordStore;
use crate::{
    db::TxContext,
    error::InfraError,
    sql::{column_ident, table_ident},
};

/// PostgreSQL 実装の DocTypeRecordStore
#[derive(Debug, Clone, Default)]
pub struct PostgresDocTypeRecordStore;

impl PostgresDocTypeRecordStore {
    pub fn new() -> Self {
        Self
    }
}

fn delete_child_rows_sql(
    child: &DocTypeName,
    parent: &DocTypeName,
    link_field: &FieldName,
) -> String {
    format!(
        "DELETE FROM {} WHERE parent IN (SELECT name FROM {} WHERE {} = $1)",
        table_ident(child),
        table_ident(parent),
        column_ident(link_field),
    )
}

fn delete_linked_rows_sql(doctype: &DocTypeName, link_field: &FieldName) -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1",
        table_ident(doctype),
        column_ident(link_field),
    )
}

#[async_trait]
impl DocTypeRecordStore for PostgresDocTypeRecordStore {
    async fn delete_child_rows(
        &self,
        tx: &mut TxContext,
        child: &DocTypeName,
        parent: &DocTypeName,
        link_field: &FieldName,
        company: &CompanyName,
    ) -> Result<u64, InfraError> {
        let sql = delete_child_rows_sql(child, parent, link_field);
        let result = sqlx::query(&sql)
            .bind(company.as_str())
            .execute(tx.conn())
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_linked_rows(
        &self,
        tx: &mut TxContext,
        doctype: &DocTypeName,
        link_field: &FieldName,
        company: &CompanyName,
    ) -> Result<u64, InfraError> {
        let sql = delete_linked_rows_sql(doctype, link_field);
        let result = sqlx::query(&sql)
            .bind(company.as_str())
            .execute(tx.conn())
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_子テーブル行の削除は親の会社リンク行をサブクエリで絞り込む() {
        let sql = delete_child_rows_sql(
            &DocTypeName::new("Sales Invoice Item").unwrap(),
            &DocTypeName::new("Sales Invoice").unwrap(),
            &FieldName::new("company").unwrap(),
        );

        assert_eq!(
            sql,
            r#"DELETE FROM "tabSales Invoice Item" WHERE parent IN (SELECT name FROM "tabSales Invoice" WHERE "company" = $1)"#
        );
    }

    #[test]
    fn test_本体行の削除はリンクフィールドで絞り込む() {
        let sql = delete_linked_rows_sql(
            &DocTypeName::new("Stock Entry").unwrap(),
            &FieldName::new("from_company").unwrap(),
        );

        assert_eq!(sql, r#"DELETE FROM "tabStock Entry" WHERE "from_company" = $1"#);
    }
}
