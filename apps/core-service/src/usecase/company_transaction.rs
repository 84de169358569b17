//! # 会社取引データ削除ユースケース
//!
//! 会社に属する取引データを、スキーマメタデータを辿ってカスケード削除する。
//!
//! ## 処理の流れ
//!
//! 1. 会社を取得し、呼び出し元を認可する（変更は一切行わない）
//! 2. トランザクションを開始する。以降のメタデータ参照もこの接続で行う
//! 3. 特別経路（Bin → Time Log）を実行する
//! 4. Company へリンクする DocType を列挙し、削除対象外を除いて
//!    子テーブル行 → 本体行 → 採番シリーズの順に処理する
//! 5. コミットする
//! 6. 通知件数キャッシュをクリアする（失敗しても結果は成功）
//!
//! Time Log の判定は Project / Task などの行を参照するため、
//! 特別経路は汎用経路より先に実行しなければならない。

use std::sync::Arc;

use purgeflow_domain::{
    DomainError,
    company::CompanyName,
    doctype::{DocTypeKind, DocTypeMeta, DocTypeName},
    naming_series::{NamingSeries, SeriesCounter},
    purge_policy,
    user::Caller,
};
use purgeflow_infra::{
    db::{TransactionManager, TxContext},
    deletion::{DeletionRegistry, DeletionReport, DeletionResult, DocTypeRecordStore},
    notification_cache::NotificationCache,
    repository::{CompanyRepository, NamingSeriesRepository, SchemaRegistry},
};

use crate::error::CoreError;

/// 会社取引データ削除ユースケース
pub struct CompanyTransactionUseCaseImpl {
    company_repository: Arc<dyn CompanyRepository>,
    schema_registry:    Arc<dyn SchemaRegistry>,
    special_deleters:   Arc<DeletionRegistry>,
    record_store:       Arc<dyn DocTypeRecordStore>,
    series_repository:  Arc<dyn NamingSeriesRepository>,
    notification_cache: Arc<dyn NotificationCache>,
    tx_manager:         Arc<dyn TransactionManager>,
}

impl CompanyTransactionUseCaseImpl {
    pub fn new(
        company_repository: Arc<dyn CompanyRepository>,
        schema_registry: Arc<dyn SchemaRegistry>,
        special_deleters: Arc<DeletionRegistry>,
        record_store: Arc<dyn DocTypeRecordStore>,
        series_repository: Arc<dyn NamingSeriesRepository>,
        notification_cache: Arc<dyn NotificationCache>,
        tx_manager: Arc<dyn TransactionManager>,
    ) -> Self {
        Self {
            company_repository,
            schema_registry,
            special_deleters,
            record_store,
            series_repository,
            notification_cache,
            tx_manager,
        }
    }

    /// 会社の取引データをすべて削除する
    ///
    /// 削除は 1 トランザクションで行い、途中のエラーでロールバックする。
    /// 成功時は DocType ごとの削除件数と再計算したシリーズを返す。
    #[tracing::instrument(skip_all, fields(company = %company_name))]
    pub async fn delete_company_transactions(
        &self,
        caller: &Caller,
        company_name: &CompanyName,
    ) -> Result<DeletionReport, CoreError> {
        let company = self
            .company_repository
            .find_by_name(company_name)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Company",
                id:          company_name.to_string(),
            })?;

        company.authorize_transaction_deletion(caller)?;

        let mut tx = self.tx_manager.begin().await?;
        let mut report = DeletionReport::default();

        for (name, result) in self
            .special_deleters
            .delete_all(&mut tx, company.name())
            .await?
        {
            report.record(name, result);
        }

        let doctypes = self
            .schema_registry
            .find_doctypes_linking_to(&mut tx, &DocTypeName::company())
            .await?;

        for doctype in &doctypes {
            if purge_policy::is_excluded(doctype) {
                tracing::debug!(doctype = %doctype, "削除対象外の DocType をスキップ");
                continue;
            }
            self.delete_for_doctype(&mut tx, doctype, company.name(), &mut report)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            total_deleted = report.total_deleted(),
            series_count = report.series.len(),
            "会社の取引データを削除しました"
        );

        if let Err(e) = self.notification_cache.clear_notifications().await {
            tracing::warn!(error = %e, "通知件数キャッシュのクリアに失敗");
        }

        Ok(report)
    }

    /// 1 つの DocType について子テーブル行・本体行を削除し、採番シリーズを再計算する
    #[tracing::instrument(skip_all, fields(doctype = %doctype))]
    async fn delete_for_doctype(
        &self,
        tx: &mut TxContext,
        doctype: &DocTypeName,
        company: &CompanyName,
        report: &mut DeletionReport,
    ) -> Result<(), CoreError> {
        let meta = self.describe(tx, doctype).await?;
        let link_field = meta
            .link_field_to(&DocTypeName::company())
            .map(|f| f.fieldname().clone())
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "{doctype} に Company へのリンクフィールドがありません"
                ))
            })?;

        if meta.kind() == DocTypeKind::Single {
            tracing::debug!("シングル DocType のためスキップ");
            return Ok(());
        }

        if meta.kind() == DocTypeKind::Standard {
            for field in meta.table_fields() {
                let Some(child) = field
                    .child_doctype()
                    .map_err(|e| CoreError::Internal(e.to_string()))?
                else {
                    continue;
                };
                // メタデータに存在する DocType 名のみ SQL に埋め込む
                let child_meta = self.describe(tx, &child).await?;

                let deleted_count = self
                    .record_store
                    .delete_child_rows(tx, child_meta.name(), doctype, &link_field, company)
                    .await?;
                tracing::info!(child = %child, deleted_count, "子テーブル行を削除");
                report.record(child.as_str(), DeletionResult { deleted_count });
            }
        }

        let deleted_count = self
            .record_store
            .delete_linked_rows(tx, doctype, &link_field, company)
            .await?;
        tracing::info!(deleted_count, "DocType の行を削除");
        report.record(doctype.as_str(), DeletionResult { deleted_count });

        self.reset_naming_series(tx, &meta, report).await
    }

    /// 残っている ID の最大値から採番シリーズのカウンターを再設定する
    async fn reset_naming_series(
        &self,
        tx: &mut TxContext,
        meta: &DocTypeMeta,
        report: &mut DeletionReport,
    ) -> Result<(), CoreError> {
        let Some(series) = meta.naming_series() else {
            return Ok(());
        };

        for prefix in series.prefixes() {
            let shadowing = series.shadowing_prefixes(prefix);
            let last = self
                .series_repository
                .max_name_with_prefix(tx, meta.name(), prefix, &shadowing)
                .await?;
            let current = last
                .as_deref()
                .map(|name| NamingSeries::counter_from_name(prefix, name))
                .unwrap_or(0);

            self.series_repository
                .upsert_current(tx, prefix, current)
                .await?;
            tracing::debug!(prefix = %prefix, current, "採番シリーズを再設定");
            report.record_series(SeriesCounter::new(prefix.as_str(), current));
        }

        Ok(())
    }

    async fn describe(
        &self,
        tx: &mut TxContext,
        doctype: &DocTypeName,
    ) -> Result<DocTypeMeta, CoreError> {
        self.schema_registry
            .describe(tx, doctype)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound {
                    entity_type: "DocType",
                    id:          doctype.to_string(),
                }
                .into()
            })
    }
}
