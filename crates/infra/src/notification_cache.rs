//! # 通知件数キャッシュ
//!
//! 取引データ削除後に、ユーザーごとの未読通知件数キャッシュを無効化する。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationCache` trait でキャッシュ無効化を抽象化
//! - **2 つの実装**: Redis（本番用）、Noop（Redis 未設定時・テスト用）
//! - **ベストエフォート**: 無効化の失敗は削除結果に影響させない。
//!   エラーを返すかどうかは実装の責務、ログ出力と握りつぶしは呼び出し側の責務

mod noop;
mod redis_cache;

use async_trait::async_trait;
pub use noop::NoopNotificationCache;
pub use redis_cache::RedisNotificationCache;

use crate::error::InfraError;

/// 通知件数キャッシュのキーパターン
pub const NOTIFICATION_COUNT_PATTERN: &str = "notification_count:*";

/// 通知件数キャッシュトレイト
#[async_trait]
pub trait NotificationCache: Send + Sync {
    /// 全ユーザーの通知件数キャッシュを削除し、削除したキー数を返す
    async fn clear_notifications(&self) -> Result<u64, InfraError>;
}
