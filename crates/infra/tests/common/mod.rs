//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するシードデータ定数・ヘルパー。
//! シードデータ本体は `tests/fixtures/*.sql` にある。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use purgeflow_domain::{company::CompanyName, doctype::DocTypeName};
use purgeflow_infra::db::{PgTransactionManager, TransactionManager, TxContext};
use sqlx::PgPool;

/// 削除対象の会社
pub fn acme() -> CompanyName {
    CompanyName::new("Acme").unwrap()
}

/// 残存確認用の会社
pub fn other_co() -> CompanyName {
    CompanyName::new("OtherCo").unwrap()
}

pub fn doctype(name: &str) -> DocTypeName {
    DocTypeName::new(name).unwrap()
}

/// トランザクションを開始する
pub async fn begin(pool: &PgPool) -> TxContext {
    PgTransactionManager::new(pool.clone())
        .begin()
        .await
        .expect("トランザクション開始に失敗")
}

/// テーブルに残っている行の `name` を名前順に返す
pub async fn names(pool: &PgPool, table: &str) -> Vec<String> {
    sqlx::query_scalar(&format!(r#"SELECT name FROM "{table}" ORDER BY name"#))
        .fetch_all(pool)
        .await
        .expect("行の取得に失敗")
}

/// 採番シリーズのカウンターを返す
pub async fn series_current(pool: &PgPool, prefix: &str) -> Option<i64> {
    sqlx::query_scalar(r#"SELECT current FROM "tabSeries" WHERE name = $1"#)
        .bind(prefix)
        .fetch_optional(pool)
        .await
        .expect("カウンターの取得に失敗")
}
