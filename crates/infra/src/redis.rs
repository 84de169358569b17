//! # Redis 接続管理
//!
//! 通知件数キャッシュを保持する Redis への接続を管理する。
//!
//! ## 設計方針
//!
//! - **ConnectionManager**: 自動再接続機能を持つ接続マネージャを使用
//! - **任意接続**: Redis は必須ではない。未設定の環境ではキャッシュクリアを
//!   何もしない実装に差し替える（[`crate::notification_cache::NoopNotificationCache`]）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use purgeflow_infra::redis;
//!
//! async fn example() -> Result<(), ::redis::RedisError> {
//!     let conn = redis::create_connection_manager("redis://localhost").await?;
//!     Ok(())
//! }
//! ```

use redis::{Client, aio::ConnectionManager};

/// Redis 接続マネージャを作成する
///
/// # 引数
///
/// * `redis_url` - Redis 接続 URL
///   - 形式: `redis://[[username:]password@]host[:port][/database]`
///   - TLS: `rediss://` スキームで TLS 接続
///
/// # エラー
///
/// - URL パースエラー: 不正な URL 形式
/// - 接続エラー: Redis サーバーに接続できない
pub async fn create_connection_manager(
    redis_url: &str,
) -> Result<ConnectionManager, redis::RedisError> {
    let client = Client::open(redis_url)?;
    ConnectionManager::new(client).await
}
