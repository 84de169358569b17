//! # SchemaRegistry
//!
//! DocType メタデータ（`"tabDocType"` / `"tabDocField"`）を読み取り、
//! カスケード削除に必要な記述子を解決する。
//!
//! ## 設計方針
//!
//! - **実行時解決**: 外部キーグラフは静的に持たず、削除のたびに問い合わせる
//! - **決定的な順序**: リンク元 DocType は名前順、フィールドは `idx` 順で返す
//! - **識別子の検証**: メタデータ上の名前は SQL に埋め込まれるため、
//!   値オブジェクトへの変換に失敗したら [`InfraError::invalid_identifier`] を返す
//! - **トランザクション内で読む**: 削除と同じ接続・スナップショットでメタデータを読む。
//!   削除中にプールから別の接続を取らないため、プールが枯渇しても待ち続けない

use async_trait::async_trait;
use purgeflow_domain::doctype::{
    DocField,
    DocTypeKind,
    DocTypeMeta,
    DocTypeName,
    FieldName,
    FieldType,
};
use crate::{db::TxContext, error::InfraError};

/// スキーマレジストリトレイト
#[async_trait]
pub trait SchemaRegistry: Send + Sync {
    /// 指定した DocType へのリンクフィールドを持つ DocType を名前順に返す
    ///
    /// 同じ DocType に複数のリンクフィールドがあっても 1 回だけ返す。
    async fn find_doctypes_linking_to(
        &self,
        tx: &mut TxContext,
        target: &DocTypeName,
    ) -> Result<Vec<DocTypeName>, InfraError>;

    /// DocType の記述子を返す
    ///
    /// メタデータに登録されていない場合は `None`。
    async fn describe(
        &self,
        tx: &mut TxContext,
        doctype: &DocTypeName,
    ) -> Result<Option<DocTypeMeta>, InfraError>;
}

/// PostgreSQL 実装の SchemaRegistry
#[derive(Debug, Clone, Default)]
pub struct PostgresSchemaRegistry;

impl PostgresSchemaRegistry {
    /// 新しいレジストリインスタンスを作成
    pub fn new() -> Self {
        Self
    }
}

fn to_doctype_name(value: &str) -> Result<DocTypeName, InfraError> {
    DocTypeName::new(value)
        .map_err(|e| InfraError::invalid_identifier(format!("{value:?}: {e}")))
}

#[async_trait]
impl SchemaRegistry for PostgresSchemaRegistry {
    async fn find_doctypes_linking_to(
        &self,
        tx: &mut TxContext,
        target: &DocTypeName,
    ) -> Result<Vec<DocTypeName>, InfraError> {
        let parents: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT parent
            FROM "tabDocField"
            WHERE fieldtype = $2 AND options = $1
            ORDER BY parent
            "#,
        )
        .bind(target.as_str())
        .bind(FieldType::Link.as_str())
        .fetch_all(tx.conn())
        .await?;

        parents.iter().map(|p| to_doctype_name(p)).collect()
    }

    async fn describe(
        &self,
        tx: &mut TxContext,
        doctype: &DocTypeName,
    ) -> Result<Option<DocTypeMeta>, InfraError> {
        let flags: Option<(i32, i32)> = sqlx::query_as(
            r#"
            SELECT COALESCE(issingle, 0)::INT4, COALESCE(istable, 0)::INT4
            FROM "tabDocType"
            WHERE name = $1
            "#,
        )
        .bind(doctype.as_str())
        .fetch_optional(tx.conn())
        .await?;

        let Some((is_single, is_table)) = flags else {
            return Ok(None);
        };

        let rows: Vec<(String, String, Option<String>)> = sqlx::query_as(
            r#"
            SELECT fieldname, fieldtype, options
            FROM "tabDocField"
            WHERE parent = $1 AND COALESCE(fieldname, '') <> ''
            ORDER BY idx
            "#,
        )
        .bind(doctype.as_str())
        .fetch_all(tx.conn())
        .await?;

        let fields = rows
            .into_iter()
            .map(|(fieldname, fieldtype, options)| {
                let fieldname = FieldName::new(&fieldname).map_err(|e| {
                    InfraError::invalid_identifier(format!("{doctype}.{fieldname:?}: {e}"))
                })?;
                Ok(DocField::new(fieldname, FieldType::parse(&fieldtype), options))
            })
            .collect::<Result<Vec<_>, InfraError>>()?;

        Ok(Some(DocTypeMeta::new(
            doctype.clone(),
            DocTypeKind::from_flags(is_single != 0, is_table != 0),
            fields,
        )))
    }
}
