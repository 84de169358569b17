//! # Core Service エラー定義
//!
//! Core Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! レスポンスボディは [`purgeflow_shared::ErrorResponse`]（RFC 9457 Problem Details）。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use purgeflow_domain::DomainError;
use purgeflow_infra::InfraError;
use purgeflow_shared::ErrorResponse;
use thiserror::Error;

/// Core Service で発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 権限不足
    #[error("権限がありません: {0}")]
    Forbidden(String),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<DomainError> for CoreError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Validation(msg) => CoreError::BadRequest(msg),
            e @ DomainError::NotFound { .. } => CoreError::NotFound(e.to_string()),
            DomainError::Forbidden(msg) => CoreError::Forbidden(msg),
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::not_found(msg)),
            CoreError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorResponse::forbidden(msg)),
            CoreError::Database(e) => {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "database",
                    span_trace = %e.span_trace(),
                    "データベースエラー: {}",
                    e
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal_error(),
                )
            }
            CoreError::Internal(msg) => {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "internal",
                    "内部エラー: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal_error(),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(CoreError::NotFound("Company が見つかりません: Acme".to_string()), StatusCode::NOT_FOUND)]
    #[case(CoreError::BadRequest("会社名が空です".to_string()), StatusCode::BAD_REQUEST)]
    #[case(CoreError::Forbidden("作成者のみ".to_string()), StatusCode::FORBIDDEN)]
    #[case(CoreError::Internal("リンクフィールドなし".to_string()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(
        CoreError::Database(InfraError::unexpected("接続断")),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn test_エラー種別ごとのステータスコード(
        #[case] error: CoreError,
        #[case] expected: StatusCode,
    ) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[test]
    fn test_domain_errorの変換() {
        let forbidden: CoreError = DomainError::Forbidden("ロールが必要です".to_string()).into();
        let not_found: CoreError = DomainError::NotFound {
            entity_type: "DocType",
            id:          "Sales Invoice".to_string(),
        }
        .into();
        let validation: CoreError = DomainError::Validation("空です".to_string()).into();

        assert!(matches!(forbidden, CoreError::Forbidden(msg) if msg == "ロールが必要です"));
        assert!(
            matches!(not_found, CoreError::NotFound(msg) if msg == "DocType が見つかりません: Sales Invoice")
        );
        assert!(matches!(validation, CoreError::BadRequest(msg) if msg == "空です"));
    }
}
