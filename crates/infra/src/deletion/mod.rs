//! # 会社取引データ削除基盤
//!
//! 会社の取引データを削除するための基盤モジュール。
//!
//! ## 概要
//!
//! 削除は 2 種類の経路で行う:
//!
//! - **汎用経路**: スキーマメタデータから会社へのリンクを解決し、
//!   [`DocTypeRecordStore`] で子テーブル行 → 本体行の順に削除する
//! - **特別経路**: 会社へ直接リンクしていないが間接的に会社に属するデータ
//!   （倉庫経由の Bin、プロジェクト等経由の Time Log）を [`CompanyDeleter`]
//!   実装として [`DeletionRegistry`] に登録し、汎用経路より先に実行する
//!
//! すべての削除は呼び出し側が開始した 1 つのトランザクション（[`TxContext`]）内で
//! 実行する。

mod doctype_records;
mod postgres_special;
mod registry;

use async_trait::async_trait;
pub use doctype_records::PostgresDocTypeRecordStore;
pub use postgres_special::{PostgresBinDeleter, PostgresTimeLogDeleter};
use purgeflow_domain::{
    company::CompanyName,
    doctype::{DocTypeName, FieldName},
    naming_series::SeriesCounter,
};
pub use registry::DeletionRegistry;

use crate::{db::TxContext, error::InfraError};

/// 削除結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionResult {
    /// 削除された件数
    pub deleted_count: u64,
}

/// DocType ごとの削除件数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedRecords {
    /// DocType 名（特別経路の場合は Deleter 名）
    ///
    /// 子テーブル行は子 DocType 名で本体とは別に記録する。
    pub source:        String,
    /// 削除された件数
    pub deleted_count: u64,
}

/// 会社取引データ削除の結果レポート
///
/// 削除は 1 トランザクションで成功か失敗のどちらかになるため、
/// 部分失敗は保持しない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    /// 削除件数（実行順）
    pub deleted: Vec<DeletedRecords>,
    /// 再計算した採番シリーズのカウンター（実行順）
    pub series:  Vec<SeriesCounter>,
}

impl DeletionReport {
    /// 削除件数を記録する
    pub fn record(&mut self, source: impl Into<String>, result: DeletionResult) {
        self.deleted.push(DeletedRecords {
            source:        source.into(),
            deleted_count: result.deleted_count,
        });
    }

    /// 再計算したカウンターを記録する
    pub fn record_series(&mut self, counter: SeriesCounter) {
        self.series.push(counter);
    }

    /// 削除件数の合計
    pub fn total_deleted(&self) -> u64 {
        self.deleted.iter().map(|d| d.deleted_count).sum()
    }
}

/// 会社データ削除トレイト
///
/// 汎用経路では削除できない、間接的に会社に属するデータの削除を提供する。
#[async_trait]
pub trait CompanyDeleter: Send + Sync {
    /// この Deleter の名前（例: `"postgres:bin"`）
    fn name(&self) -> &'static str;

    /// 指定した会社に属するデータを削除する
    async fn delete(
        &self,
        tx: &mut TxContext,
        company: &CompanyName,
    ) -> Result<DeletionResult, InfraError>;
}

/// DocType 行ストアトレイト
///
/// メタデータで解決したテーブル・列に対する行削除を提供する。
#[async_trait]
pub trait DocTypeRecordStore: Send + Sync {
    /// 親 DocType の会社リンク行が所有する子テーブル行を削除する
    ///
    /// 子テーブル行は `parent` 列で親行の `name` を参照する。
    async fn delete_child_rows(
        &self,
        tx: &mut TxContext,
        child: &DocTypeName,
        parent: &DocTypeName,
        link_field: &FieldName,
        company: &CompanyName,
    ) -> Result<u64, InfraError>;

    /// リンクフィールドが会社を指す行を削除する
    async fn delete_linked_rows(
        &self,
        tx: &mut TxContext,
        doctype: &DocTypeName,
        link_field: &FieldName,
        company: &CompanyName,
    ) -> Result<u64, InfraError>;
}
