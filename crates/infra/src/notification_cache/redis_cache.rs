//! Redis 通知件数キャッシュ実装
//!
//! `notification_count:*` に一致するキーを SCAN で列挙して削除する。
//! `KEYS` はサーバーをブロックするため使わない。

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};

use super::{NOTIFICATION_COUNT_PATTERN, NotificationCache};
use crate::error::InfraError;

/// Redis 通知件数キャッシュ
pub struct RedisNotificationCache {
    conn: ConnectionManager,
}

impl RedisNotificationCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// SCAN でパターンにマッチするキーを全て削除し、削除件数を返す
    async fn scan_and_delete(&self, pattern: &str) -> Result<u64, InfraError> {
        let mut conn = self.conn.clone();
        let mut deleted: u64 = 0;
        let mut cursor = 0u64;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let removed: u64 = conn.del(&keys).await?;
                deleted += removed;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(deleted)
    }
}

#[async_trait]
impl NotificationCache for RedisNotificationCache {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn clear_notifications(&self) -> Result<u64, InfraError> {
        let deleted = self.scan_and_delete(NOTIFICATION_COUNT_PATTERN).await?;
        tracing::debug!(deleted, "通知件数キャッシュをクリア");
        Ok(deleted)
    }
}
