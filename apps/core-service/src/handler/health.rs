//! # ヘルスチェックハンドラ
//!
//! Core Service の稼働状態を確認するためのエンドポイント。
//!
//! - `/health`: Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready`: Readiness Check（DB と、設定されていれば Redis の接続状態を確認）
//!
//! レスポンス型は [`purgeflow_shared::HealthResponse`] / [`purgeflow_shared::ReadinessResponse`] を参照。

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use purgeflow_shared::{CheckStatus, HealthResponse, ReadinessResponse};
use redis::aio::ConnectionManager;
use sqlx::PgPool;

/// 各チェックのタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// ヘルスチェックエンドポイント
///
/// サーバーが正常に稼働していることを確認するためのエンドポイント。
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub pool:       PgPool,
    pub redis_conn: Option<ConnectionManager>,
}

/// Readiness Check エンドポイント
///
/// DB と Redis の接続状態を並行チェックする。
/// 全チェック OK → 200、1 つでも失敗 → 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let (database, redis) = tokio::join!(
        check_database(&state.pool),
        check_redis(state.redis_conn.clone()),
    );

    let mut checks = BTreeMap::from([("database".to_string(), database)]);
    if let Some(redis) = redis {
        checks.insert("redis".to_string(), redis);
    }

    let response = ReadinessResponse::from_checks(checks);
    let http_status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(response))
}

/// DB への接続を `SELECT 1` で確認する
async fn check_database(pool: &PgPool) -> CheckStatus {
    match tokio::time::timeout(CHECK_TIMEOUT, sqlx::query("SELECT 1").execute(pool)).await {
        Ok(Ok(_)) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: database query failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: database check timed out");
            CheckStatus::Error
        }
    }
}

/// Redis への接続を PING で確認する
///
/// Redis が設定されていない場合は `None`（チェック対象外）。
async fn check_redis(conn: Option<ConnectionManager>) -> Option<CheckStatus> {
    let mut conn = conn?;
    let status = match tokio::time::timeout(
        CHECK_TIMEOUT,
        redis::cmd("PING").query_async::<String>(&mut conn),
    )
    .await
    {
        Ok(Ok(_)) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: redis ping failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: redis check timed out");
            CheckStatus::Error
        }
    };
    Some(status)
}
