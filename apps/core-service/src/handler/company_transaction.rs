//! # 会社取引データハンドラ
//!
//! 会社取引データ削除の内部 API を提供する。
//!
//! ## エンドポイント
//!
//! - `POST /internal/companies/{company_name}/transactions/delete` - 取引データの削除
//!
//! ## リクエスト例
//!
//! ```json
//! { "user_id": "owner@acme.example" }
//! ```
//!
//! 呼び出し元のロールは `tabHas Role` から解決する。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use purgeflow_domain::{
    company::CompanyName,
    naming_series::SeriesCounter,
    user::{Caller, UserId},
};
use purgeflow_infra::{
    deletion::{DeletedRecords, DeletionReport},
    repository::UserRoleRepository,
};
use purgeflow_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{error::CoreError, usecase::CompanyTransactionUseCaseImpl};

/// 会社取引データ API の共有状態
pub struct CompanyTransactionState {
    pub user_role_repository: Arc<dyn UserRoleRepository>,
    pub usecase:              CompanyTransactionUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 取引データ削除リクエスト
#[derive(Debug, Deserialize)]
pub struct DeleteTransactionsRequest {
    pub user_id: String,
}

/// DocType ごとの削除件数 DTO
#[derive(Debug, Serialize)]
pub struct DeletedRecordsDto {
    pub source:        String,
    pub deleted_count: u64,
}

impl From<DeletedRecords> for DeletedRecordsDto {
    fn from(records: DeletedRecords) -> Self {
        Self {
            source:        records.source,
            deleted_count: records.deleted_count,
        }
    }
}

/// 削除結果 DTO
#[derive(Debug, Serialize)]
pub struct DeletionReportDto {
    pub deleted:       Vec<DeletedRecordsDto>,
    pub series:        Vec<SeriesCounter>,
    pub total_deleted: u64,
}

impl From<DeletionReport> for DeletionReportDto {
    fn from(report: DeletionReport) -> Self {
        let total_deleted = report.total_deleted();
        Self {
            deleted: report.deleted.into_iter().map(Into::into).collect(),
            series: report.series,
            total_deleted,
        }
    }
}

// --- ハンドラ ---

/// POST /internal/companies/{company_name}/transactions/delete
///
/// 会社の取引データを削除し、削除件数と再設定した採番シリーズを返す。
pub async fn delete_company_transactions(
    State(state): State<Arc<CompanyTransactionState>>,
    Path(company_name): Path<String>,
    Json(req): Json<DeleteTransactionsRequest>,
) -> Result<impl IntoResponse, CoreError> {
    let company_name = CompanyName::new(&company_name)?;
    let user_id = UserId::new(&req.user_id)?;

    let roles = state.user_role_repository.find_roles(&user_id).await?;
    let caller = Caller::new(user_id, roles);

    let report = state
        .usecase
        .delete_company_transactions(&caller, &company_name)
        .await?;

    let response = ApiResponse::new(DeletionReportDto::from(report));
    Ok((StatusCode::OK, Json(response)))
}
