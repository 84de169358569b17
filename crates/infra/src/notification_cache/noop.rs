//! Noop 通知件数キャッシュ実装
//!
//! Redis を使わない環境向け。何も削除せずログ出力のみ行う。

use async_trait::async_trait;

use super::NotificationCache;
use crate::error::InfraError;

/// Noop 通知件数キャッシュ（ログ出力のみ）
#[derive(Debug, Clone, Default)]
pub struct NoopNotificationCache;

#[async_trait]
impl NotificationCache for NoopNotificationCache {
    async fn clear_notifications(&self) -> Result<u64, InfraError> {
        tracing::debug!("Noop: 通知件数キャッシュのクリアをスキップ");
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clear_notificationsは0件を返す() {
        let cache = NoopNotificationCache;

        let result = cache.clear_notifications().await;
        assert_eq!(result.unwrap(), 0);
    }
}
