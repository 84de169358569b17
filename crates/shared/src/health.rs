//! # ヘルスチェック共通型
//!
//! Liveness（`/health`）と Readiness（`/health/ready`）エンドポイントの
//! レスポンス型を提供する。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// `status` はサービスの稼働状態、`version` は Cargo.toml のバージョンを示す。
///
/// ## 使用例
///
/// ```
/// use purgeflow_shared::HealthResponse;
///
/// let response = HealthResponse::healthy("0.1.0");
/// assert_eq!(response.status, "healthy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 稼働状態
    pub status:  String,
    /// アプリケーションバージョン
    pub version: String,
}

impl HealthResponse {
    /// 稼働中のレスポンスを作成する
    pub fn healthy(version: impl Into<String>) -> Self {
        Self {
            status:  "healthy".to_string(),
            version: version.into(),
        }
    }
}

/// 個別チェックの結果ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

/// Readiness 全体のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    /// 全依存先が利用可能
    Ready,
    /// 一部の依存先が利用不可
    NotReady,
}

/// Readiness Check レスポンス
///
/// `checks` のキーは依存先の名前（`"database"`, `"redis"` など）。
/// キーの順序を安定させるため BTreeMap を使う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: ReadinessStatus,
    pub checks: BTreeMap<String, CheckStatus>,
}

impl ReadinessResponse {
    /// 個別チェック結果から全体のステータスを決定する
    ///
    /// 1 つでも [`CheckStatus::Error`] があれば [`ReadinessStatus::NotReady`]。
    pub fn from_checks(checks: BTreeMap<String, CheckStatus>) -> Self {
        let status = if checks.values().all(|c| *c == CheckStatus::Ok) {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        };
        Self { status, checks }
    }

    /// 全依存先が利用可能かどうか
    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_health_responseのserializeで正しいjson形状にする() {
        let json = serde_json::to_value(HealthResponse::healthy("0.1.0")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "healthy",
                "version": "0.1.0"
            })
        );
    }

    #[test]
    fn test_全チェック成功ならreadyになる() {
        let checks = BTreeMap::from([
            ("database".to_string(), CheckStatus::Ok),
            ("redis".to_string(), CheckStatus::Ok),
        ]);

        let response = ReadinessResponse::from_checks(checks);

        assert!(response.is_ready());
    }

    #[test]
    fn test_1つでも失敗ならnot_readyになる() {
        let checks = BTreeMap::from([
            ("database".to_string(), CheckStatus::Ok),
            ("redis".to_string(), CheckStatus::Error),
        ]);

        let response = ReadinessResponse::from_checks(checks);
        let json = serde_json::to_value(&response).unwrap();

        assert!(!response.is_ready());
        assert_eq!(json["status"], "not_ready");
        assert_eq!(json["checks"]["database"], "ok");
        assert_eq!(json["checks"]["redis"], "error");
    }
}
