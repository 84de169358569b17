//! # Core Service 設定
//!
//! 環境変数から Core Service サーバーの設定を読み込む。

use std::env;

use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません（.env を確認してください）")]
    Missing(&'static str),

    /// 値の形式が不正
    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Core Service サーバーの設定
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// データベース接続 URL
    pub database_url: String,
    /// Redis 接続 URL（未設定の場合、通知件数キャッシュのクリアは行わない）
    pub redis_url:    Option<String>,
}

impl CoreConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の取得関数から設定を読み込む
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port_value = lookup("CORE_PORT").ok_or(ConfigError::Missing("CORE_PORT"))?;
        let port = port_value.parse().map_err(|_| ConfigError::Invalid {
            name:  "CORE_PORT",
            value: port_value.clone(),
        })?;

        Ok(Self {
            host: lookup("CORE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            redis_url: lookup("REDIS_URL").filter(|url| !url.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_必須項目のみで既定値が補われる() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            ("CORE_PORT", "3001"),
            ("DATABASE_URL", "postgres://localhost/erp"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert_eq!(config.database_url, "postgres://localhost/erp");
        assert_eq!(config.redis_url, None);
    }

    #[test]
    fn test_redis_urlが空文字列なら未設定として扱う() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            ("CORE_PORT", "3001"),
            ("DATABASE_URL", "postgres://localhost/erp"),
            ("REDIS_URL", ""),
        ]))
        .unwrap();

        assert_eq!(config.redis_url, None);
    }

    #[test]
    fn test_core_port未設定でmissingエラー() {
        let result =
            CoreConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/erp")]));

        assert!(matches!(result, Err(ConfigError::Missing("CORE_PORT"))));
    }

    #[test]
    fn test_core_portが数値でなければinvalidエラー() {
        let result = CoreConfig::from_lookup(lookup_from(&[
            ("CORE_PORT", "abc"),
            ("DATABASE_URL", "postgres://localhost/erp"),
        ]));

        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "CORE_PORT", .. })
        ));
    }

    #[test]
    fn test_database_url未設定でmissingエラー() {
        let result = CoreConfig::from_lookup(lookup_from(&[("CORE_PORT", "3001")]));

        assert!(matches!(result, Err(ConfigError::Missing("DATABASE_URL"))));
    }
}
