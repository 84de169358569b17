//! # DeletionRegistry
//!
//! 特別経路の `CompanyDeleter` を集約し、登録順に実行する。

use purgeflow_domain::company::CompanyName;

use super::{CompanyDeleter, DeletionResult, PostgresBinDeleter, PostgresTimeLogDeleter};
use crate::{db::TxContext, error::InfraError};

/// 特別経路の削除レジストリ
pub struct DeletionRegistry {
    deleters: Vec<Box<dyn CompanyDeleter>>,
}

impl Default for DeletionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeletionRegistry {
    /// 空のレジストリを生成する
    pub fn new() -> Self {
        Self {
            deleters: Vec::new(),
        }
    }

    /// Deleter を登録する
    pub fn register(&mut self, deleter: Box<dyn CompanyDeleter>) {
        self.deleters.push(deleter);
    }

    /// 特別経路の Deleter をすべて登録済みのレジストリを生成する
    pub fn with_special_deleters() -> Self {
        let mut registry = Self::new();
        // Bin → Time Log の順で固定
        registry.register(Box::new(PostgresBinDeleter::new()));
        registry.register(Box::new(PostgresTimeLogDeleter::new()));
        registry
    }

    /// 期待される Deleter 名の一覧を返す（登録漏れ検出テスト用）
    pub fn expected_deleter_names() -> Vec<&'static str> {
        vec!["postgres:bin", "postgres:time_log"]
    }

    /// 登録済み Deleter の名前一覧を返す
    pub fn registered_names(&self) -> Vec<&'static str> {
        self.deleters.iter().map(|d| d.name()).collect()
    }

    /// 全 Deleter で会社のデータを削除する
    ///
    /// 登録順に実行し、最初のエラーで中断する。
    /// 中断した場合、呼び出し側がトランザクションをロールバックする。
    pub async fn delete_all(
        &self,
        tx: &mut TxContext,
        company: &CompanyName,
    ) -> Result<Vec<(&'static str, DeletionResult)>, InfraError> {
        let mut results = Vec::with_capacity(self.deleters.len());

        for deleter in &self.deleters {
            let result = deleter.delete(tx, company).await.inspect_err(|error| {
                tracing::error!(
                    deleter = deleter.name(),
                    error = %error,
                    "特別経路の削除に失敗"
                );
            })?;
            tracing::info!(
                deleter = deleter.name(),
                deleted_count = result.deleted_count,
                "特別経路の削除が完了"
            );
            results.push((deleter.name(), result));
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    };

    use pretty_assertions::assert_eq;

    use super::*;

    /// テスト用のモック Deleter
    struct MockDeleter {
        name:        &'static str,
        count:       AtomicU64,
        should_fail: bool,
        calls:       Arc<AtomicUsize>,
    }

    impl MockDeleter {
        fn new(name: &'static str, initial_count: u64, calls: Arc<AtomicUsize>) -> Self {
            Self {
                name,
                count: AtomicU64::new(initial_count),
                should_fail: false,
                calls,
            }
        }

        fn failing(name: &'static str, calls: Arc<AtomicUsize>) -> Self {
            Self {
                name,
                count: AtomicU64::new(0),
                should_fail: true,
                calls,
            }
        }
    }

    #[async_trait::async_trait]
    impl CompanyDeleter for MockDeleter {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn delete(
            &self,
            _tx: &mut TxContext,
            _company: &CompanyName,
        ) -> Result<DeletionResult, InfraError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                return Err(InfraError::unexpected(format!("{}: テスト用エラー", self.name)));
            }
            let deleted = self.count.swap(0, Ordering::SeqCst);
            Ok(DeletionResult {
                deleted_count: deleted,
            })
        }
    }

    fn acme() -> CompanyName {
        CompanyName::new("Acme").unwrap()
    }

    #[test]
    fn test_空のレジストリのregistered_namesは空vecを返す() {
        let registry = DeletionRegistry::new();
        assert!(registry.registered_names().is_empty());
    }

    #[test]
    fn test_with_special_deletersは期待されるdeleterを順序どおりに登録する() {
        let registry = DeletionRegistry::with_special_deleters();

        assert_eq!(
            registry.registered_names(),
            DeletionRegistry::expected_deleter_names()
        );
    }

    #[tokio::test]
    async fn test_delete_allは登録順に結果を返す() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = DeletionRegistry::new();
        registry.register(Box::new(MockDeleter::new("test:a", 3, calls.clone())));
        registry.register(Box::new(MockDeleter::new("test:b", 5, calls.clone())));

        let mut tx = TxContext::mock();
        let results = registry.delete_all(&mut tx, &acme()).await.unwrap();

        assert_eq!(
            results,
            vec![
                ("test:a", DeletionResult { deleted_count: 3 }),
                ("test:b", DeletionResult { deleted_count: 5 }),
            ]
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_delete_allは最初のエラーで中断し残りを実行しない() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = DeletionRegistry::new();
        registry.register(Box::new(MockDeleter::failing("test:a", calls.clone())));
        registry.register(Box::new(MockDeleter::new("test:b", 5, calls.clone())));

        let mut tx = TxContext::mock();
        let result = registry.delete_all(&mut tx, &acme()).await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_空のレジストリのdelete_allは空の結果を返す() {
        let registry = DeletionRegistry::new();

        let mut tx = TxContext::mock();
        let results = registry.delete_all(&mut tx, &acme()).await.unwrap();

        assert!(results.is_empty());
    }
}
